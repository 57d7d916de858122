use actix_web::{get, post, web, HttpResponse, Result};

use crate::handlers::prediction_handler;
use crate::models::auth::Claims;
use crate::models::prediction::SubmitPredictionRequest;
use crate::services::prediction_service::PredictionService;

#[post("")]
async fn submit_prediction(
    body: web::Json<SubmitPredictionRequest>,
    claims: Option<web::ReqData<Claims>>,
    service: web::Data<PredictionService>,
) -> Result<HttpResponse> {
    prediction_handler::submit_prediction(body, claims, service).await
}

#[get("/me")]
async fn get_my_predictions(
    claims: web::ReqData<Claims>,
    service: web::Data<PredictionService>,
) -> Result<HttpResponse> {
    prediction_handler::get_my_predictions(claims, service).await
}
