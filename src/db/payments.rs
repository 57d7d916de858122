use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::payment::Payment;

pub async fn insert_payment(
    pool: &PgPool,
    user_id: Uuid,
    amount: f64,
    status: &str,
) -> Result<Payment, sqlx::Error> {
    sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (id, user_id, amount, date, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, amount, date, status
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(amount)
    .bind(Utc::now())
    .bind(status)
    .fetch_one(pool)
    .await
}

/// All payments, newest first.
pub async fn list_payments(pool: &PgPool) -> Result<Vec<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(
        "SELECT id, user_id, amount, date, status FROM payments ORDER BY date DESC",
    )
    .fetch_all(pool)
    .await
}
