use thiserror::Error;
use uuid::Uuid;

use super::types::MatchStatus;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("match not found: {id}")]
    NotFound { id: Uuid },

    #[error("match {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: Uuid,
        from: MatchStatus,
        to: MatchStatus,
    },

    #[error("similarity must be a finite value in [0, 1], got {value}")]
    InvalidSimilarity { value: f64 },
}

impl LedgerError {
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::NotFound { .. } => "not_found",
            LedgerError::InvalidTransition { .. } => "invalid_transition",
            LedgerError::InvalidSimilarity { .. } => "invalid_similarity",
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
