use thiserror::Error;

use crate::model::VectorError;

/// Scoring failures. Only [`ScoringError::EmptyInput`] is batch-level; the rest are
/// isolated to a single candidate and absorbed by the ranker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("empty input: {reason}")]
    EmptyInput { reason: String },

    #[error("feature dimension mismatch: source has {expected}, candidate has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("failed to decode feature vector: {0}")]
    Decode(#[from] VectorError),

    #[error("scoring computation failed: {reason}")]
    InternalScoring { reason: String },
}

impl ScoringError {
    /// Short, stable label used in logs and metadata.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::EmptyInput { .. } => "empty_input",
            ScoringError::DimensionMismatch { .. } => "dimension_mismatch",
            ScoringError::Decode(_) => "decode",
            ScoringError::InternalScoring { .. } => "internal_scoring",
        }
    }
}

pub type ScoringResult<T> = Result<T, ScoringError>;
