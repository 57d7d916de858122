use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::models::matches::{Match, MatchRequest, MatchStatus};
use crate::models::prediction::SweepSummary;
use crate::repository::{PredictionRepository, RepositoryError};
use crate::services::prediction_service::{PredictionError, PredictionService};

#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Match not found")]
    NotFound,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Failed to recalculate points: {0}")]
    Scoring(#[from] PredictionError),
}

/// Administrative match management. Every save re-runs scoring for the match.
#[derive(Clone)]
pub struct MatchService {
    repository: Arc<dyn PredictionRepository>,
    predictions: PredictionService,
}

impl MatchService {
    pub fn new(predictions: PredictionService) -> Self {
        Self {
            repository: predictions.repository().clone(),
            predictions,
        }
    }

    pub async fn get_match(&self, match_id: Uuid) -> Result<Match, MatchServiceError> {
        self.repository
            .get_match(match_id)
            .await?
            .ok_or(MatchServiceError::NotFound)
    }

    /// Matches ordered by kickoff; the finished list is most recent first.
    pub async fn list_matches(&self, status: Option<MatchStatus>) -> Result<Vec<Match>, MatchServiceError> {
        let mut matches = self.repository.list_matches(status).await?;
        if status == Some(MatchStatus::Finished) {
            matches.reverse();
        }
        Ok(matches)
    }

    #[tracing::instrument(name = "Creating match", skip(self, request), fields(request = %request))]
    pub async fn create_match(&self, request: &MatchRequest) -> Result<Match, MatchServiceError> {
        validate_request(request)?;

        let mut fixture = Match::new(request.team1.trim(), request.team2.trim(), request.start_time);
        apply_result(&mut fixture, request);
        self.repository.insert_match(&fixture).await?;

        tracing::info!("Created match {}: {} vs {}", fixture.id, fixture.team1, fixture.team2);
        Ok(fixture)
    }

    #[tracing::instrument(name = "Updating match", skip(self, request), fields(request = %request))]
    pub async fn update_match(
        &self,
        match_id: Uuid,
        request: &MatchRequest,
    ) -> Result<(Match, SweepSummary), MatchServiceError> {
        validate_request(request)?;

        let mut fixture = self.get_match(match_id).await?;
        fixture.team1 = request.team1.trim().to_string();
        fixture.team2 = request.team2.trim().to_string();
        fixture.start_time = request.start_time;
        apply_result(&mut fixture, request);
        fixture.updated_at = Utc::now();

        self.repository.update_match(&fixture).await.map_err(|e| match e {
            RepositoryError::NotFound => MatchServiceError::NotFound,
            other => MatchServiceError::Repository(other),
        })?;

        let summary = self
            .predictions
            .finalize_match_result(&fixture, fixture.team1_score, fixture.team2_score)
            .await?;

        Ok((fixture, summary))
    }

    #[tracing::instrument(name = "Deleting match", skip(self))]
    pub async fn delete_match(&self, match_id: Uuid) -> Result<(), MatchServiceError> {
        self.repository.delete_match(match_id).await.map_err(|e| match e {
            RepositoryError::NotFound => MatchServiceError::NotFound,
            other => MatchServiceError::Repository(other),
        })
    }
}

fn validate_request(request: &MatchRequest) -> Result<(), MatchServiceError> {
    if request.team1.trim().is_empty() || request.team2.trim().is_empty() {
        return Err(MatchServiceError::Validation("Team names are required".to_string()));
    }
    if request.team1_score.is_some() != request.team2_score.is_some() {
        return Err(MatchServiceError::Validation(
            "Provide scores for both teams or for neither".to_string(),
        ));
    }
    if request.team1_score.unwrap_or(0) < 0 || request.team2_score.unwrap_or(0) < 0 {
        return Err(MatchServiceError::Validation("Scores cannot be negative".to_string()));
    }
    Ok(())
}

/// Upcoming matches carry no score.
fn apply_result(fixture: &mut Match, request: &MatchRequest) {
    fixture.status = request.status;
    if request.status == MatchStatus::Upcoming {
        fixture.team1_score = None;
        fixture.team2_score = None;
    } else {
        fixture.team1_score = request.team1_score;
        fixture.team2_score = request.team2_score;
    }
}
