// src/models/matches.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Live,
    Finished,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Match {
    pub id: Uuid,
    pub team1: String,
    pub team2: String,
    pub start_time: DateTime<Utc>,
    pub status: MatchStatus,
    pub team1_score: Option<i32>,
    pub team2_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn new(team1: impl Into<String>, team2: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            team1: team1.into(),
            team2: team2.into(),
            start_time,
            status: MatchStatus::Upcoming,
            team1_score: None,
            team2_score: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The final score, available only once the match is finished with both sides recorded.
    pub fn final_score(&self) -> Option<(i32, i32)> {
        if self.status != MatchStatus::Finished {
            return None;
        }
        match (self.team1_score, self.team2_score) {
            (Some(team1), Some(team2)) => Some((team1, team2)),
            _ => None,
        }
    }
}

/// Fields an administrator submits when creating or editing a match.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchRequest {
    pub team1: String,
    pub team2: String,
    pub start_time: DateTime<Utc>,
    #[serde(default = "default_status")]
    pub status: MatchStatus,
    pub team1_score: Option<i32>,
    pub team2_score: Option<i32>,
}

fn default_status() -> MatchStatus {
    MatchStatus::Upcoming
}

impl fmt::Display for MatchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {} at {} ({})", self.team1, self.team2, self.start_time, self.status)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchListQuery {
    pub status: Option<MatchStatus>,
}
