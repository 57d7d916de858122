use actix_web::{http, web, App, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use actix_cors::Cors;

pub mod config;
mod routes;
mod handlers;
pub mod models;
pub mod utils;
mod middleware;
pub mod db;
pub mod game;
pub mod repository;
pub mod services;
pub mod telemetry;
use crate::routes::init_routes;
use crate::config::jwt::JwtSettings;
use crate::config::settings::PredictionSettings;
use crate::repository::{PgPredictionRepository, PredictionRepository};
use crate::services::{MatchService, PredictionService};

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    jwt_settings: JwtSettings,
    prediction_settings: PredictionSettings,
) -> Result<Server, std::io::Error> {
    let repository: Arc<dyn PredictionRepository> = Arc::new(PgPredictionRepository::new(db_pool.clone()));
    let prediction_service = PredictionService::new(repository, &prediction_settings);
    let match_service = MatchService::new(prediction_service.clone());

    // Wrap using web::Data, which boils down to an Arc smart pointer
    let db_pool_data = web::Data::new(db_pool);
    let jwt_settings = web::Data::new(jwt_settings);
    let prediction_service = web::Data::new(prediction_service);
    let match_service = web::Data::new(match_service);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Get a pointer copy and attach it to the application state
            .app_data(db_pool_data.clone())
            .app_data(jwt_settings.clone())
            .app_data(prediction_service.clone())
            .app_data(match_service.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
