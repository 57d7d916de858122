use actix_web::{get, web, HttpResponse, Result};
use uuid::Uuid;

use crate::handlers::match_handler;
use crate::models::matches::MatchListQuery;
use crate::services::match_service::MatchService;

#[get("")]
async fn list_matches(
    query: web::Query<MatchListQuery>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match_handler::list_matches(query, service).await
}

#[get("/{match_id}")]
async fn get_match(
    path: web::Path<Uuid>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match_handler::get_match(path, service).await
}
