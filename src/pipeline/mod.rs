//! Glue between ranking, the ledger and the task pool.
//!
//! A found-pet report is ranked against lost-pet reports of the same species and every
//! surviving comparison is upserted as a pending match. Both this and photo feature
//! extraction can be submitted as background tasks (`find_matches_<id>`,
//! `proc_photo_<id>`).

pub mod error;
pub mod matcher;
pub mod source;

#[cfg(test)]
mod tests;

pub use error::{PipelineError, PipelineResult};
pub use matcher::{
    FIND_MATCHES_TASK_PREFIX, MatchPipeline, PROCESS_PHOTO_TASK_PREFIX, extract_pet,
    find_matches_task_id, process_photo_task_id,
};
pub use source::{CandidateSource, InMemoryCandidateSource};
