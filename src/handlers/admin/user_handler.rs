use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::helpers::{db_result, require_record};
use crate::db::users;
use crate::models::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::user::{UpdatePaymentStatusRequest, PAYMENT_STATUS_PAID, PAYMENT_STATUS_PENDING};
use crate::ok_or_return;

// GET /admin/users - List every user
pub async fn get_users(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let all_users = ok_or_return!(db_result(users::list_users(&pool).await));
    Ok(HttpResponse::Ok().json(ApiResponse::listed("users", all_users)))
}

// PATCH /admin/users/{id}/admin - Flip the admin flag
pub async fn toggle_admin(
    path: web::Path<Uuid>,
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    if claims.user_id() == Some(user_id) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(
            "You cannot change your own admin status",
        )));
    }

    let user = ok_or_return!(require_record(
        users::toggle_admin(&pool, user_id).await,
        "User not found"
    ));
    tracing::info!("Admin {} set is_admin={} for user {}", claims.username, user.is_admin, user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success("Admin status updated", user)))
}

// PATCH /admin/users/{id}/payment-status
pub async fn update_payment_status(
    path: web::Path<Uuid>,
    body: web::Json<UpdatePaymentStatusRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let status = body.payment_status.trim().to_lowercase();
    if status != PAYMENT_STATUS_PAID && status != PAYMENT_STATUS_PENDING {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(format!(
            "Payment status must be '{}' or '{}'",
            PAYMENT_STATUS_PENDING, PAYMENT_STATUS_PAID
        ))));
    }

    let user = ok_or_return!(require_record(
        users::set_payment_status(&pool, path.into_inner(), &status).await,
        "User not found"
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success("Payment status updated", user)))
}

// DELETE /admin/users/{id}
pub async fn delete_user(
    path: web::Path<Uuid>,
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    if claims.user_id() == Some(user_id) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(
            "You cannot delete your own account",
        )));
    }

    let deleted = ok_or_return!(db_result(users::delete_user(&pool, user_id).await));
    if !deleted {
        return Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("User not found")));
    }

    tracing::info!("Admin {} deleted user {}", claims.username, user_id);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("User deleted")))
}
