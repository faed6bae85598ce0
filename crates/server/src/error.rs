//! Errors returned by the orchestrator.

use pipeline::MAX_TOP_N;
use sources::ParseListKindError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("User {0:?} has not been ingested")]
    UserNotIngested(String),

    #[error("Film {0:?} is not in the catalogue")]
    FilmNotFound(String),

    #[error("k must be between 1 and {max}, got {0}", max = MAX_TOP_N)]
    InvalidK(usize),

    #[error("Unknown list kind {0:?} (expected watched, watchlist or all)")]
    InvalidListKind(String),

    #[error("Recommendation pipeline failed: {0:#}")]
    Pipeline(#[from] anyhow::Error),
}

impl From<ParseListKindError> for RecommendError {
    fn from(err: ParseListKindError) -> Self {
        RecommendError::InvalidListKind(err.0)
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
