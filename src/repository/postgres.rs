use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::matches::{Match, MatchStatus};
use crate::models::prediction::{PointChange, Prediction};
use crate::repository::{PredictionRepository, RepositoryError};

const MATCH_COLUMNS: &str =
    "id, team1, team2, start_time, status, team1_score, team2_score, created_at, updated_at";

const PREDICTION_COLUMNS: &str = "id, user_id, match_id, team1_prediction, team2_prediction, \
     points_earned, boost_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgPredictionRepository {
    pool: PgPool,
}

impl PgPredictionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PredictionRepository for PgPredictionRepository {
    async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, RepositoryError> {
        let fixture = sqlx::query_as::<_, Match>(&format!(
            "SELECT {} FROM matches WHERE id = $1",
            MATCH_COLUMNS
        ))
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(fixture)
    }

    async fn list_matches(&self, status: Option<MatchStatus>) -> Result<Vec<Match>, RepositoryError> {
        let matches = match status {
            Some(status) => {
                sqlx::query_as::<_, Match>(&format!(
                    "SELECT {} FROM matches WHERE status = $1 ORDER BY start_time ASC",
                    MATCH_COLUMNS
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Match>(&format!(
                    "SELECT {} FROM matches ORDER BY start_time ASC",
                    MATCH_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(matches)
    }

    async fn insert_match(&self, fixture: &Match) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO matches (id, team1, team2, start_time, status, team1_score, team2_score, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(fixture.id)
        .bind(&fixture.team1)
        .bind(&fixture.team2)
        .bind(fixture.start_time)
        .bind(fixture.status)
        .bind(fixture.team1_score)
        .bind(fixture.team2_score)
        .bind(fixture.created_at)
        .bind(fixture.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_match(&self, fixture: &Match) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE matches
            SET
                team1 = $2,
                team2 = $3,
                start_time = $4,
                status = $5,
                team1_score = $6,
                team2_score = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(fixture.id)
        .bind(&fixture.team1)
        .bind(&fixture.team2)
        .bind(fixture.start_time)
        .bind(fixture.status)
        .bind(fixture.team1_score)
        .bind(fixture.team2_score)
        .bind(fixture.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_match(&self, match_id: Uuid) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // A user holds at most one prediction per match, so the join touches each user once
        sqlx::query(
            r#"
            UPDATE users u
            SET total_points = u.total_points - p.points_earned,
                updated_at = NOW()
            FROM predictions p
            WHERE p.user_id = u.id
              AND p.match_id = $1
              AND p.points_earned <> 0
            "#,
        )
        .bind(match_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_prediction(&self, user_id: Uuid, match_id: Uuid) -> Result<Option<Prediction>, RepositoryError> {
        let prediction = sqlx::query_as::<_, Prediction>(&format!(
            "SELECT {} FROM predictions WHERE user_id = $1 AND match_id = $2",
            PREDICTION_COLUMNS
        ))
        .bind(user_id)
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(prediction)
    }

    async fn upsert_prediction(
        &self,
        user_id: Uuid,
        match_id: Uuid,
        team1_prediction: i32,
        team2_prediction: i32,
        boost_active: bool,
    ) -> Result<Prediction, RepositoryError> {
        let prediction = sqlx::query_as::<_, Prediction>(&format!(
            r#"
            INSERT INTO predictions (
                id, user_id, match_id, team1_prediction, team2_prediction,
                points_earned, boost_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 0, $6, $7, $7)
            ON CONFLICT (user_id, match_id) DO UPDATE SET
                team1_prediction = EXCLUDED.team1_prediction,
                team2_prediction = EXCLUDED.team2_prediction,
                boost_active = EXCLUDED.boost_active,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            PREDICTION_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(match_id)
        .bind(team1_prediction)
        .bind(team2_prediction)
        .bind(boost_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(prediction)
    }

    async fn predictions_for_match(&self, match_id: Uuid) -> Result<Vec<Prediction>, RepositoryError> {
        let predictions = sqlx::query_as::<_, Prediction>(&format!(
            "SELECT {} FROM predictions WHERE match_id = $1",
            PREDICTION_COLUMNS
        ))
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(predictions)
    }

    async fn predictions_for_user(&self, user_id: Uuid) -> Result<Vec<Prediction>, RepositoryError> {
        let predictions = sqlx::query_as::<_, Prediction>(&format!(
            "SELECT {} FROM predictions WHERE user_id = $1 ORDER BY created_at DESC",
            PREDICTION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(predictions)
    }

    async fn apply_point_changes(&self, scored: &Match, changes: &[PointChange]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Holding the match row serializes sweeps and result edits for this match
        let stored = sqlx::query_as::<_, Match>(&format!(
            "SELECT {} FROM matches WHERE id = $1 FOR UPDATE",
            MATCH_COLUMNS
        ))
        .bind(scored.id)
        .fetch_optional(&mut *tx)
        .await?;

        match stored {
            Some(stored) if stored.final_score() == scored.final_score() => {}
            Some(_) => {
                tx.rollback().await?;
                return Err(RepositoryError::StaleResult(scored.id));
            }
            None => {
                tx.rollback().await?;
                return Err(RepositoryError::NotFound);
            }
        }

        for change in changes {
            // Compare-and-set against the value the sweep scored from
            let updated = sqlx::query(
                r#"
                UPDATE predictions
                SET points_earned = $1
                WHERE id = $2 AND points_earned = $3
                "#,
            )
            .bind(change.new_points)
            .bind(change.prediction_id)
            .bind(change.expected_points)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(RepositoryError::Conflict(change.prediction_id));
            }

            sqlx::query(
                r#"
                UPDATE users
                SET total_points = total_points + $1,
                    updated_at = NOW()
                WHERE id = $2
                "#,
            )
            .bind(change.delta())
            .bind(change.user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn user_total_points(&self, user_id: Uuid) -> Result<Option<i32>, RepositoryError> {
        let total = sqlx::query_scalar::<_, i32>("SELECT total_points FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(total)
    }
}
