// src/handlers/auth_handler.rs
use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::jwt::JwtSettings;
use crate::db::users;
use crate::models::auth::{LoginRequest, LoginResponse};
use crate::models::common::ApiResponse;
use crate::utils::password::verify_password;

#[tracing::instrument(
    name = "Login user attempt",
    skip(login_form, pool, jwt_settings),
    fields(
        username = %login_form.username
    )
)]
pub async fn login_user(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>
) -> HttpResponse {
    let user = match users::find_by_username(&pool, &login_form.username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!("User not found or invalid credentials");
            return HttpResponse::Unauthorized().json(ApiResponse::<()>::error("Invalid username or password."));
        }
        Err(e) => {
            tracing::error!("Database error occurred: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    if !verify_password(login_form.password.expose_secret(), &user.password_hash) {
        tracing::info!("Invalid password");
        return HttpResponse::Unauthorized().json(ApiResponse::<()>::error("Invalid username or password."));
    }

    // Accounts stay closed until an admin records payment
    if !user.has_paid() {
        tracing::info!("Login refused for unpaid account {}", user.id);
        return HttpResponse::Forbidden().json(ApiResponse::<()>::error(format!(
            "Account status: {}. Please contact admin for payment.",
            user.payment_status
        )));
    }

    let token = match jwt_settings.issue_token(&user) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Error generating JWT token: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    HttpResponse::Ok().json(LoginResponse {
        token,
        user_id: user.id,
        is_admin: user.is_admin,
    })
}
