use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Prediction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub team1_prediction: i32,
    pub team2_prediction: i32,
    pub points_earned: i32,
    pub boost_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A score as typed by a player. Forms send strings, API clients send numbers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ScoreField {
    Number(i64),
    Decimal(f64),
    Text(String),
}

impl ScoreField {
    /// The score as an integer, if the field holds one that fits the stored column.
    pub fn as_score(&self) -> Option<i32> {
        match self {
            ScoreField::Number(n) => i32::try_from(*n).ok(),
            ScoreField::Decimal(_) => None,
            ScoreField::Text(s) => s.trim().parse::<i32>().ok(),
        }
    }
}

impl From<i32> for ScoreField {
    fn from(value: i32) -> Self {
        ScoreField::Number(value as i64)
    }
}

impl From<&str> for ScoreField {
    fn from(value: &str) -> Self {
        ScoreField::Text(value.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubmitPredictionRequest {
    pub match_id: Uuid,
    pub team1_score: Option<ScoreField>,
    pub team2_score: Option<ScoreField>,
    #[serde(default)]
    pub boost_active: bool,
}

/// Points movement for one prediction, applied by a finalize sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointChange {
    pub prediction_id: Uuid,
    pub user_id: Uuid,
    /// `points_earned` as read before scoring; the write only lands if it still holds.
    pub expected_points: i32,
    pub new_points: i32,
}

impl PointChange {
    pub fn delta(&self) -> i32 {
        self.new_points - self.expected_points
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub predictions_scored: usize,
    pub predictions_changed: usize,
    pub total_delta: i32,
}
