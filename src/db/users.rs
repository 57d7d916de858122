use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{User, PAYMENT_STATUS_PENDING};

const USER_COLUMNS: &str =
    "id, username, password_hash, is_admin, total_points, payment_status, created_at, updated_at";

pub async fn insert_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, username, password_hash, is_admin, total_points, payment_status, created_at, updated_at)
        VALUES ($1, $2, $3, FALSE, 0, $4, $5, $5)
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(password_hash)
    .bind(PAYMENT_STATUS_PENDING)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username = $1",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users ORDER BY created_at ASC",
        USER_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

/// Users ranked by total points, ties broken by username.
pub async fn leaderboard(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users ORDER BY total_points DESC, username ASC",
        USER_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

pub async fn toggle_admin(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET is_admin = NOT is_admin, updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn set_payment_status(
    pool: &PgPool,
    user_id: Uuid,
    payment_status: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET payment_status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(user_id)
    .bind(payment_status)
    .fetch_optional(pool)
    .await
}

/// Returns false when no such user existed. Predictions and payments cascade.
pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
