use thiserror::Error;
use uuid::Uuid;

use crate::extraction::ExtractionError;
use crate::ledger::LedgerError;
use crate::tasks::TaskError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("found pet not found: {id}")]
    FoundPetNotFound { id: Uuid },

    #[error("no pet detected in photo {photo_id}")]
    NoPetDetected { photo_id: String },

    #[error("no feature extractor configured")]
    ExtractorUnavailable,

    #[error("ranking failed: {0}")]
    Ranking(String),

    #[error("candidate source error: {0}")]
    Source(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Task(#[from] TaskError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
