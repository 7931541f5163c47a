//! PetRadar matching library (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Matching Core
//! - [`SimilarityScorer`], [`ComparisonResult`], [`FeatureWeights`] - Pairwise scoring
//! - [`MatchRanker`], [`RankOptions`], [`RankingOutcome`] - Batch ranking
//! - [`MatchLedger`], [`MatchRecord`], [`MatchStatus`] - Persisted pairings
//! - [`TaskRegistry`], [`BackgroundTask`], [`TaskStatus`] - Background jobs
//!
//! ## Pipeline
//! - [`MatchPipeline`] - Ranking plus ledger upserts, optionally as background tasks
//! - [`CandidateSource`], [`FeatureExtractor`] - Collaborator seams
//!
//! ## Model
//! - [`FeatureVector`], [`Attributes`], [`GeoPoint`], [`Candidate`], [`PetProfile`]
//!
//! ## Server
//! - [`Config`], [`ConfigError`] - Environment-backed settings
//! - [`gateway`] - Axum router for task status and match review
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod extraction;
pub mod gateway;
pub mod ledger;
pub mod model;
pub mod pipeline;
pub mod ranking;
pub mod scoring;
pub mod tasks;

pub use config::{Config, ConfigError};
pub use extraction::{ExtractedFeatures, ExtractionError, ExtractionResult, FeatureExtractor};
#[cfg(any(test, feature = "mock"))]
pub use extraction::MockFeatureExtractor;
pub use ledger::{
    LedgerError, LedgerResult, MatchLedger, MatchRecord, MatchStatus, UpsertAction,
    UpsertOutcome,
};
pub use model::{
    AgeBucket, Attributes, BreedGuess, Candidate, ColorGuess, FeatureVector, GeoDistance,
    GeoPoint, Haversine, PetProfile, SizeBucket, VectorError, cosine_similarity,
};
pub use pipeline::{
    CandidateSource, InMemoryCandidateSource, MatchPipeline, PipelineError, PipelineResult,
};
pub use ranking::{
    MatchRanker, RankOptions, RankedComparison, RankerConfig, RankingMetadata, RankingOutcome,
};
pub use scoring::{
    ComparisonResult, FeatureWeights, ScoringConfig, ScoringError, ScoringResult,
    SimilarityScorer, UnusableReason, WeightVector,
};
pub use tasks::{
    BackgroundTask, TaskError, TaskLookup, TaskRegistry, TaskRegistryConfig, TaskResult,
    TaskStatus, TaskSummary,
};
