//! Multi-factor similarity between a source pet report and one candidate.
//!
//! [`SimilarityScorer::compare`] combines four component scores, each in `[0, 1]`:
//!
//! | component  | input                         | score                                  |
//! |------------|-------------------------------|----------------------------------------|
//! | visual     | feature vectors               | cosine similarity clipped to `[0, 1]`  |
//! | attribute  | breed / colors / age / size   | mean over facets present on both sides |
//! | location   | [`GeoPoint`](crate::model::GeoPoint)s | `max(0, 1 - km / max_distance_km)` |
//! | time       | observation dates             | `max(0, 1 - days / max_days)`          |
//!
//! `overall` is the weighted sum with weights normalized by [`FeatureWeights::normalize`].
//! Missing inputs zero their own component; only a feature-dimension mismatch marks the
//! whole pair unusable (see [`ComparisonResult::is_usable`]).

pub mod error;
pub mod scorer;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{ScoringError, ScoringResult};
pub use scorer::{
    ScoringConfig, SimilarityScorer, attribute_score, matching_features, visual_score,
};
pub use types::{ComparisonResult, FeatureWeights, UnusableReason, WeightVector};
