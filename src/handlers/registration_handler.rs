use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::db::helpers::ensure_not_exists;
use crate::db::users;
use crate::models::common::ApiResponse;
use crate::models::user::RegistrationRequest;
use crate::utils::password::{hash_password, MIN_PASSWORD_LENGTH};

#[tracing::instrument(
    name = "Adding a new user",
    // Don't show arguments
    skip(user_form, pool),
    fields(
        username = %user_form.username
    )
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>
) -> HttpResponse {
    let username = user_form.username.trim();
    let password = user_form.password.expose_secret();

    if username.is_empty() {
        return HttpResponse::BadRequest().json(ApiResponse::<()>::error("Username is required."));
    }
    if password != user_form.confirm_password.expose_secret() {
        return HttpResponse::BadRequest().json(ApiResponse::<()>::error("Passwords do not match."));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return HttpResponse::BadRequest().json(ApiResponse::<()>::error(format!(
            "Password must be at least {} characters.",
            MIN_PASSWORD_LENGTH
        )));
    }

    if let Err(response) = ensure_not_exists(
        users::find_by_username(&pool, username).await,
        "Username already taken."
    ) {
        return response;
    }

    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Failed to hash password: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    match users::insert_user(&pool, username, &password_hash).await {
        Ok(user) => {
            tracing::info!("Registered user {}", user.id);
            HttpResponse::Created().json(ApiResponse::success("User registered", user))
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            HttpResponse::Conflict().json(ApiResponse::<()>::error("Username already taken."))
        }
        Err(e) => {
            tracing::error!("Failed to execute user insert query: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
