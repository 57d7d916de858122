use actix_web::{web, HttpResponse, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::handlers::match_handler::match_error_response;
use crate::models::common::ApiResponse;
use crate::models::matches::{Match, MatchRequest};
use crate::models::prediction::SweepSummary;
use crate::services::match_service::MatchService;

#[derive(Serialize)]
pub struct MatchUpdateResponse {
    #[serde(rename = "match")]
    pub fixture: Match,
    pub sweep: SweepSummary,
}

// POST /admin/matches - Create a match
pub async fn create_match(
    body: web::Json<MatchRequest>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match service.create_match(&body).await {
        Ok(fixture) => Ok(HttpResponse::Created().json(ApiResponse::success("Match created", fixture))),
        Err(e) => Ok(match_error_response(e)),
    }
}

// PUT /admin/matches/{id} - Edit a match and rescore its predictions
pub async fn update_match(
    path: web::Path<Uuid>,
    body: web::Json<MatchRequest>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();

    match service.update_match(match_id, &body).await {
        Ok((fixture, sweep)) => {
            tracing::info!(
                "Match {} saved, {} of {} predictions rescored",
                match_id, sweep.predictions_changed, sweep.predictions_scored
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                "Match updated",
                MatchUpdateResponse { fixture, sweep },
            )))
        }
        Err(e) => Ok(match_error_response(e)),
    }
}

// DELETE /admin/matches/{id}
pub async fn delete_match(
    path: web::Path<Uuid>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match service.delete_match(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Match deleted"))),
        Err(e) => Ok(match_error_response(e)),
    }
}
