use actix_web::{web, HttpResponse, Result};

use crate::models::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::prediction::{Prediction, SubmitPredictionRequest};
use crate::repository::RepositoryError;
use crate::services::prediction_service::{PredictionError, PredictionService};

/// POST /predictions - create or edit the caller's prediction
pub async fn submit_prediction(
    body: web::Json<SubmitPredictionRequest>,
    claims: Option<web::ReqData<Claims>>,
    service: web::Data<PredictionService>,
) -> Result<HttpResponse> {
    let user_id = claims.and_then(|claims| claims.user_id());

    let result = service
        .submit_or_update(
            user_id,
            body.match_id,
            body.team1_score.as_ref(),
            body.team2_score.as_ref(),
            body.boost_active,
        )
        .await;

    match result {
        Ok(prediction) => Ok(HttpResponse::Ok().json(ApiResponse::success("Prediction saved", prediction))),
        Err(e) => Ok(prediction_error_response(e)),
    }
}

/// GET /predictions/me - the caller's predictions, newest first
pub async fn get_my_predictions(
    claims: web::ReqData<Claims>,
    service: web::Data<PredictionService>,
) -> Result<HttpResponse> {
    let Some(user_id) = claims.user_id() else {
        return Ok(prediction_error_response(PredictionError::Unauthorized));
    };

    match service.repository().predictions_for_user(user_id).await {
        Ok(predictions) => Ok(HttpResponse::Ok().json(ApiResponse::<Vec<Prediction>>::listed(
            "predictions",
            predictions,
        ))),
        Err(e) => {
            tracing::error!("Failed to load predictions for {}: {}", user_id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Failed to load predictions")))
        }
    }
}

pub fn prediction_error_response(error: PredictionError) -> HttpResponse {
    let body = ApiResponse::<()>::error(error.to_string());
    match error {
        PredictionError::Unauthorized => HttpResponse::Unauthorized().json(body),
        PredictionError::InvalidInput(_) => HttpResponse::BadRequest().json(body),
        PredictionError::NotFound => HttpResponse::NotFound().json(body),
        PredictionError::Locked => HttpResponse::Conflict().json(body),
        PredictionError::Repository(RepositoryError::Conflict(_)) => {
            tracing::warn!("Gave up on contended prediction write: {}", body.message);
            HttpResponse::Conflict().json(ApiResponse::<()>::error("Points are being updated, please retry"))
        }
        PredictionError::Repository(e) => {
            tracing::error!("Prediction storage failure: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Database error"))
        }
    }
}
