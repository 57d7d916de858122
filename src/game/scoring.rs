use std::cmp::Ordering;

use crate::models::matches::Match;
use crate::models::prediction::Prediction;

pub const EXACT_SCORE_POINTS: i32 = 7;
pub const ONE_SIDE_EXACT_POINTS: i32 = 5;
pub const CORRECT_OUTCOME_POINTS: i32 = 2;
pub const BOOST_MULTIPLIER: i32 = 2;

/// Which side a scoreline favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Team1Win,
    Team2Win,
    Draw,
}

impl Outcome {
    pub fn from_scores(team1: i32, team2: i32) -> Self {
        match team1.cmp(&team2) {
            Ordering::Greater => Outcome::Team1Win,
            Ordering::Less => Outcome::Team2Win,
            Ordering::Equal => Outcome::Draw,
        }
    }
}

/// Points a prediction earns against a match result.
///
/// Tiers are checked in order: exact score (7), one side exact (5), correct
/// winner or correct draw (2), otherwise 0. A boosted prediction earns double.
/// Matches without a final score earn nothing.
pub fn score(fixture: &Match, prediction: &Prediction) -> i32 {
    let Some((actual1, actual2)) = fixture.final_score() else {
        return 0;
    };

    let points = tier_points(
        (actual1, actual2),
        (prediction.team1_prediction, prediction.team2_prediction),
    );

    if prediction.boost_active {
        points * BOOST_MULTIPLIER
    } else {
        points
    }
}

fn tier_points(actual: (i32, i32), predicted: (i32, i32)) -> i32 {
    let team1_exact = actual.0 == predicted.0;
    let team2_exact = actual.1 == predicted.1;

    if team1_exact && team2_exact {
        EXACT_SCORE_POINTS
    } else if team1_exact || team2_exact {
        ONE_SIDE_EXACT_POINTS
    } else if Outcome::from_scores(actual.0, actual.1) == Outcome::from_scores(predicted.0, predicted.1) {
        CORRECT_OUTCOME_POINTS
    } else {
        0
    }
}
