pub mod match_service;
pub mod prediction_service;

pub use match_service::{MatchService, MatchServiceError};
pub use prediction_service::{PredictionError, PredictionService};
