use actix_web::web;

use crate::handlers::admin::{
    match_handler,
    payment_handler,
    user_handler,
};
use crate::middleware::admin::AdminMiddleware;

pub fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AdminMiddleware)
            // Match management routes
            .service(
                web::resource("/matches")
                    .route(web::post().to(match_handler::create_match))
            )
            .service(
                web::resource("/matches/{id}")
                    .route(web::put().to(match_handler::update_match))
                    .route(web::delete().to(match_handler::delete_match))
            )

            // User management routes
            .service(
                web::resource("/users")
                    .route(web::get().to(user_handler::get_users))
            )
            .service(
                web::resource("/users/{id}")
                    .route(web::delete().to(user_handler::delete_user))
            )
            .service(
                web::resource("/users/{id}/admin")
                    .route(web::patch().to(user_handler::toggle_admin))
            )
            .service(
                web::resource("/users/{id}/payment-status")
                    .route(web::patch().to(user_handler::update_payment_status))
            )

            // Payment routes
            .service(
                web::resource("/payments")
                    .route(web::get().to(payment_handler::get_payments))
                    .route(web::post().to(payment_handler::record_payment))
            )
    );
}
