use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::matches::{Match, MatchStatus};
use crate::models::prediction::{PointChange, Prediction};
use crate::repository::{PredictionRepository, RepositoryError};

#[derive(Debug, Default)]
struct MemoryState {
    user_totals: HashMap<Uuid, i32>,
    matches: HashMap<Uuid, Match>,
    predictions: HashMap<Uuid, Prediction>,
}

/// Process-local repository. One lock guards all state, so every call is atomic.
#[derive(Debug, Default)]
pub struct InMemoryPredictionRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryPredictionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with a zero total so predictions can reference them.
    pub async fn add_user(&self, user_id: Uuid) {
        self.state.lock().await.user_totals.entry(user_id).or_insert(0);
    }

    pub async fn prediction_count(&self) -> usize {
        self.state.lock().await.predictions.len()
    }
}

#[async_trait]
impl PredictionRepository for InMemoryPredictionRepository {
    async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, RepositoryError> {
        Ok(self.state.lock().await.matches.get(&match_id).cloned())
    }

    async fn list_matches(&self, status: Option<MatchStatus>) -> Result<Vec<Match>, RepositoryError> {
        let state = self.state.lock().await;
        let mut matches: Vec<Match> = state
            .matches
            .values()
            .filter(|fixture| status.map_or(true, |wanted| fixture.status == wanted))
            .cloned()
            .collect();
        matches.sort_by_key(|fixture| fixture.start_time);
        Ok(matches)
    }

    async fn insert_match(&self, fixture: &Match) -> Result<(), RepositoryError> {
        self.state.lock().await.matches.insert(fixture.id, fixture.clone());
        Ok(())
    }

    async fn update_match(&self, fixture: &Match) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        match state.matches.get_mut(&fixture.id) {
            Some(stored) => {
                *stored = fixture.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete_match(&self, match_id: Uuid) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        if state.matches.remove(&match_id).is_none() {
            return Err(RepositoryError::NotFound);
        }

        let removed: Vec<Prediction> = state
            .predictions
            .values()
            .filter(|prediction| prediction.match_id == match_id)
            .cloned()
            .collect();

        for prediction in removed {
            state.predictions.remove(&prediction.id);
            if let Some(total) = state.user_totals.get_mut(&prediction.user_id) {
                *total -= prediction.points_earned;
            }
        }
        Ok(())
    }

    async fn get_prediction(&self, user_id: Uuid, match_id: Uuid) -> Result<Option<Prediction>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .predictions
            .values()
            .find(|prediction| prediction.user_id == user_id && prediction.match_id == match_id)
            .cloned())
    }

    async fn upsert_prediction(
        &self,
        user_id: Uuid,
        match_id: Uuid,
        team1_prediction: i32,
        team2_prediction: i32,
        boost_active: bool,
    ) -> Result<Prediction, RepositoryError> {
        let mut state = self.state.lock().await;
        if !state.user_totals.contains_key(&user_id) || !state.matches.contains_key(&match_id) {
            return Err(RepositoryError::NotFound);
        }

        let now = Utc::now();
        let existing = state
            .predictions
            .values_mut()
            .find(|prediction| prediction.user_id == user_id && prediction.match_id == match_id);

        if let Some(prediction) = existing {
            prediction.team1_prediction = team1_prediction;
            prediction.team2_prediction = team2_prediction;
            prediction.boost_active = boost_active;
            prediction.updated_at = now;
            return Ok(prediction.clone());
        }

        let prediction = Prediction {
            id: Uuid::new_v4(),
            user_id,
            match_id,
            team1_prediction,
            team2_prediction,
            points_earned: 0,
            boost_active,
            created_at: now,
            updated_at: now,
        };
        state.predictions.insert(prediction.id, prediction.clone());
        Ok(prediction)
    }

    async fn predictions_for_match(&self, match_id: Uuid) -> Result<Vec<Prediction>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .predictions
            .values()
            .filter(|prediction| prediction.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn predictions_for_user(&self, user_id: Uuid) -> Result<Vec<Prediction>, RepositoryError> {
        let state = self.state.lock().await;
        let mut predictions: Vec<Prediction> = state
            .predictions
            .values()
            .filter(|prediction| prediction.user_id == user_id)
            .cloned()
            .collect();
        predictions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(predictions)
    }

    async fn apply_point_changes(&self, scored: &Match, changes: &[PointChange]) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;

        match state.matches.get(&scored.id) {
            Some(stored) if stored.final_score() == scored.final_score() => {}
            Some(_) => return Err(RepositoryError::StaleResult(scored.id)),
            None => return Err(RepositoryError::NotFound),
        }

        // Validate the whole batch before touching anything
        for change in changes {
            match state.predictions.get(&change.prediction_id) {
                Some(prediction) if prediction.points_earned == change.expected_points => {}
                Some(_) => return Err(RepositoryError::Conflict(change.prediction_id)),
                None => return Err(RepositoryError::NotFound),
            }
        }

        for change in changes {
            if let Some(prediction) = state.predictions.get_mut(&change.prediction_id) {
                prediction.points_earned = change.new_points;
            }
            *state.user_totals.entry(change.user_id).or_insert(0) += change.delta();
        }
        Ok(())
    }

    async fn user_total_points(&self, user_id: Uuid) -> Result<Option<i32>, RepositoryError> {
        Ok(self.state.lock().await.user_totals.get(&user_id).copied())
    }
}
