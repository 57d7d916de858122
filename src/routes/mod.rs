use actix_web::web;

pub mod admin;
pub mod auth;
pub mod backend_health;
pub mod leaderboard;
pub mod matches;
pub mod predictions;
pub mod registration;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(backend_health::backend_health)
        .service(auth::login)
        .service(leaderboard::leaderboard);

    cfg.service(
        web::scope("/matches")
            .service(matches::list_matches)
            .service(matches::get_match)
    );
    // Prediction routes (require authentication)
    cfg.service(
        web::scope("/predictions")
            .wrap(AuthMiddleware)
            .service(predictions::submit_prediction)
            .service(predictions::get_my_predictions)
    );
    admin::init_admin_routes(cfg);
}
