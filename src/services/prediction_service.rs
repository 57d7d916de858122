use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::settings::PredictionSettings;
use crate::game::{score, LockWindow};
use crate::models::matches::Match;
use crate::models::prediction::{PointChange, Prediction, ScoreField, SweepSummary};
use crate::repository::{PredictionRepository, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("You must be logged in to predict")]
    Unauthorized,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Match not found")]
    NotFound,

    #[error("Predictions are locked for this match")]
    Locked,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Accepts prediction submissions and re-scores predictions when a match result changes.
#[derive(Clone)]
pub struct PredictionService {
    repository: Arc<dyn PredictionRepository>,
    lock_window: LockWindow,
    max_sweep_attempts: u32,
}

impl PredictionService {
    pub fn new(repository: Arc<dyn PredictionRepository>, settings: &PredictionSettings) -> Self {
        Self {
            repository,
            lock_window: LockWindow::from_minutes(settings.lock_window_minutes),
            max_sweep_attempts: settings.max_sweep_attempts.max(1),
        }
    }

    pub fn repository(&self) -> &Arc<dyn PredictionRepository> {
        &self.repository
    }

    /// Create or edit the caller's prediction for a match, checked against the server clock.
    pub async fn submit_or_update(
        &self,
        user_id: Option<Uuid>,
        match_id: Uuid,
        team1_pred: Option<&ScoreField>,
        team2_pred: Option<&ScoreField>,
        boost_active: bool,
    ) -> Result<Prediction, PredictionError> {
        self.submit_or_update_at(user_id, match_id, team1_pred, team2_pred, boost_active, Utc::now())
            .await
    }

    #[tracing::instrument(name = "Submitting prediction", skip(self, team1_pred, team2_pred))]
    pub async fn submit_or_update_at(
        &self,
        user_id: Option<Uuid>,
        match_id: Uuid,
        team1_pred: Option<&ScoreField>,
        team2_pred: Option<&ScoreField>,
        boost_active: bool,
        now: DateTime<Utc>,
    ) -> Result<Prediction, PredictionError> {
        let user_id = user_id.ok_or(PredictionError::Unauthorized)?;

        let (team1, team2) = match (team1_pred, team2_pred) {
            (Some(team1), Some(team2)) => (team1, team2),
            _ => {
                return Err(PredictionError::InvalidInput(
                    "Please enter scores for both teams".to_string(),
                ))
            }
        };
        let (team1, team2) = match (team1.as_score(), team2.as_score()) {
            (Some(team1), Some(team2)) => (team1, team2),
            _ => {
                return Err(PredictionError::InvalidInput(
                    "Scores must be whole numbers".to_string(),
                ))
            }
        };
        if team1 < 0 || team2 < 0 {
            return Err(PredictionError::InvalidInput(
                "Scores cannot be negative".to_string(),
            ));
        }

        let fixture = self
            .repository
            .get_match(match_id)
            .await?
            .ok_or(PredictionError::NotFound)?;

        if !self.lock_window.is_open(&fixture, now) {
            tracing::info!(
                "Rejected prediction after lock at {}",
                self.lock_window.locks_at(&fixture)
            );
            return Err(PredictionError::Locked);
        }

        let prediction = self
            .repository
            .upsert_prediction(user_id, match_id, team1, team2, boost_active)
            .await?;

        tracing::info!(
            "Stored prediction {} ({}-{}, boost: {})",
            prediction.id, team1, team2, boost_active
        );
        Ok(prediction)
    }

    /// Re-score every prediction on `fixture` once it is finished with both scores set.
    ///
    /// Only predictions whose points move are written, and each owner's total
    /// moves by the same difference. Running it again with the same result
    /// changes nothing. A sweep that loses a race with another sweep re-reads
    /// the stored match and its predictions and tries again.
    #[tracing::instrument(
        name = "Finalizing match result",
        skip(self, fixture),
        fields(match_id = %fixture.id, status = %fixture.status)
    )]
    pub async fn finalize_match_result(
        &self,
        fixture: &Match,
        team1_score: Option<i32>,
        team2_score: Option<i32>,
    ) -> Result<SweepSummary, PredictionError> {
        let mut result = fixture.clone();
        result.team1_score = team1_score;
        result.team2_score = team2_score;

        if result.final_score().is_none() {
            tracing::debug!("Match has no final result, nothing to score");
            return Ok(SweepSummary::default());
        }

        let mut attempt = 1;
        loop {
            match self.sweep(&result).await {
                Ok(summary) => {
                    tracing::info!(
                        "Scored {} predictions, {} changed, total delta {}",
                        summary.predictions_scored, summary.predictions_changed, summary.total_delta
                    );
                    return Ok(summary);
                }
                Err(e @ (RepositoryError::Conflict(_) | RepositoryError::StaleResult(_)))
                    if attempt < self.max_sweep_attempts =>
                {
                    tracing::warn!("Sweep attempt {} lost a race: {}, retrying", attempt, e);
                    attempt += 1;

                    // Score against whatever result is stored now
                    match self.repository.get_match(fixture.id).await? {
                        Some(stored) if stored.final_score().is_some() => result = stored,
                        _ => return Ok(SweepSummary::default()),
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to finalize match: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    async fn sweep(&self, fixture: &Match) -> Result<SweepSummary, RepositoryError> {
        let predictions = self.repository.predictions_for_match(fixture.id).await?;

        let changes: Vec<PointChange> = predictions
            .iter()
            .filter_map(|prediction| {
                let new_points = score(fixture, prediction);
                (new_points != prediction.points_earned).then(|| PointChange {
                    prediction_id: prediction.id,
                    user_id: prediction.user_id,
                    expected_points: prediction.points_earned,
                    new_points,
                })
            })
            .collect();

        self.repository.apply_point_changes(fixture, &changes).await?;

        Ok(SweepSummary {
            predictions_scored: predictions.len(),
            predictions_changed: changes.len(),
            total_delta: changes.iter().map(PointChange::delta).sum(),
        })
    }
}
