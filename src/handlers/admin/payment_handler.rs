use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;

use crate::db::helpers::{db_result, require_record};
use crate::db::{payments, users};
use crate::models::common::ApiResponse;
use crate::models::payment::RecordPaymentRequest;
use crate::ok_or_return;

// GET /admin/payments - Newest first
pub async fn get_payments(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let all_payments = ok_or_return!(db_result(payments::list_payments(&pool).await));
    Ok(HttpResponse::Ok().json(ApiResponse::listed("payments", all_payments)))
}

// POST /admin/payments - Record a payment against a user
pub async fn record_payment(
    body: web::Json<RecordPaymentRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    if !body.amount.is_finite() || body.amount <= 0.0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(
            "Amount must be greater than zero",
        )));
    }

    let user = ok_or_return!(require_record(
        users::find_by_id(&pool, body.user_id).await,
        "User not found"
    ));

    let payment = ok_or_return!(db_result(
        payments::insert_payment(&pool, user.id, body.amount, body.status.trim()).await
    ));
    tracing::info!("Recorded payment {} of {} for {}", payment.id, payment.amount, user.username);

    Ok(HttpResponse::Created().json(ApiResponse::success("Payment recorded", payment)))
}
