use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub user_id: Uuid,
    pub amount: f64,
    #[serde(default = "default_payment_status")]
    pub status: String,
}

fn default_payment_status() -> String {
    "completed".to_string()
}
