use async_trait::async_trait;
use uuid::Uuid;

use crate::models::matches::{Match, MatchStatus};
use crate::models::prediction::{PointChange, Prediction};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryPredictionRepository;
pub use postgres::PgPredictionRepository;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Points for prediction {0} changed during the sweep")]
    Conflict(Uuid),

    #[error("Result for match {0} changed during the sweep")]
    StaleResult(Uuid),

    #[error("Record not found")]
    NotFound,
}

/// Storage the prediction engine and match administration run against.
///
/// Every method is one atomic unit of work. `apply_point_changes` in
/// particular must apply all changes or none.
#[async_trait]
pub trait PredictionRepository: Send + Sync {
    async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, RepositoryError>;

    /// Matches ordered by kickoff, optionally restricted to one status.
    async fn list_matches(&self, status: Option<MatchStatus>) -> Result<Vec<Match>, RepositoryError>;

    async fn insert_match(&self, fixture: &Match) -> Result<(), RepositoryError>;

    /// Overwrite the stored match. `NotFound` if it does not exist.
    async fn update_match(&self, fixture: &Match) -> Result<(), RepositoryError>;

    /// Remove the match with its predictions, taking their points back out of
    /// the owners' totals. `NotFound` if it does not exist.
    async fn delete_match(&self, match_id: Uuid) -> Result<(), RepositoryError>;

    async fn get_prediction(&self, user_id: Uuid, match_id: Uuid) -> Result<Option<Prediction>, RepositoryError>;

    /// Create the prediction for (user, match) or update its scores and boost in
    /// place, keeping id and points_earned.
    async fn upsert_prediction(
        &self,
        user_id: Uuid,
        match_id: Uuid,
        team1_prediction: i32,
        team2_prediction: i32,
        boost_active: bool,
    ) -> Result<Prediction, RepositoryError>;

    async fn predictions_for_match(&self, match_id: Uuid) -> Result<Vec<Prediction>, RepositoryError>;

    /// The user's predictions, newest first.
    async fn predictions_for_user(&self, user_id: Uuid) -> Result<Vec<Prediction>, RepositoryError>;

    /// Write new points for each prediction and move each owner's total by
    /// the difference. `scored` is the match as the changes were computed
    /// from; if the stored result differs the batch aborts with `StaleResult`.
    /// A prediction whose stored points no longer equal `expected_points`
    /// aborts the whole batch with `Conflict`.
    async fn apply_point_changes(&self, scored: &Match, changes: &[PointChange]) -> Result<(), RepositoryError>;

    async fn user_total_points(&self, user_id: Uuid) -> Result<Option<i32>, RepositoryError>;
}
