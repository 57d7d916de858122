use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::models::common::ApiResponse;
use crate::models::matches::MatchListQuery;
use crate::repository::RepositoryError;
use crate::services::match_service::{MatchService, MatchServiceError};
use crate::services::prediction_service::PredictionError;

/// GET /matches?status=upcoming|live|finished
pub async fn list_matches(
    query: web::Query<MatchListQuery>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match service.list_matches(query.status).await {
        Ok(matches) => Ok(HttpResponse::Ok().json(ApiResponse::listed("matches", matches))),
        Err(e) => Ok(match_error_response(e)),
    }
}

/// GET /matches/{id}
pub async fn get_match(
    path: web::Path<Uuid>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match service.get_match(path.into_inner()).await {
        Ok(fixture) => Ok(HttpResponse::Ok().json(ApiResponse::success("Match found", fixture))),
        Err(e) => Ok(match_error_response(e)),
    }
}

pub fn match_error_response(error: MatchServiceError) -> HttpResponse {
    match error {
        MatchServiceError::Validation(message) => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::error(message))
        }
        MatchServiceError::NotFound | MatchServiceError::Scoring(PredictionError::NotFound) => {
            HttpResponse::NotFound().json(ApiResponse::<()>::error("Match not found"))
        }
        MatchServiceError::Scoring(PredictionError::Repository(
            e @ (RepositoryError::Conflict(_) | RepositoryError::StaleResult(_)),
        )) => {
            tracing::warn!("Points sweep kept losing races: {}", e);
            HttpResponse::Conflict().json(ApiResponse::<()>::error(
                "Match saved but points are still being updated, please save again",
            ))
        }
        e => {
            tracing::error!("Match operation failed: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Database error"))
        }
    }
}
