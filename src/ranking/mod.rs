//! Candidate ranking: drives [`crate::scoring`] across a batch.
//!
//! Steps: validate input → score each candidate in input order (bad candidates are logged
//! and skipped) → keep `overall >= threshold` → stable sort best first → truncate →
//! attach [`RankingMetadata`].

pub mod ranker;
pub mod types;


pub use ranker::MatchRanker;
pub use types::{RankOptions, RankedComparison, RankerConfig, RankingMetadata, RankingOutcome};
