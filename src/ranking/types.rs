use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_MAX_RESULTS, DEFAULT_SIMILARITY_THRESHOLD};
use crate::scoring::{ComparisonResult, FeatureWeights, WeightVector};

#[derive(Debug, Clone, PartialEq)]
pub struct RankerConfig {
    /// Minimum `overall` score a candidate needs to be kept.
    pub similarity_threshold: f64,
    /// Cap on returned comparisons when the caller does not supply one. `None` keeps all.
    pub max_results: Option<usize>,
    /// Fixed embedding dimension. `None` accepts whatever the source decodes to and lets
    /// the scorer reject candidates of a different size.
    pub embedding_dim: Option<usize>,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_results: Some(DEFAULT_MAX_RESULTS),
            embedding_dim: None,
        }
    }
}

/// Per-call overrides. Unset fields fall back to [`RankerConfig`] and scorer defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RankOptions {
    #[serde(default)]
    pub weights: Option<FeatureWeights>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl RankOptions {
    pub fn with_weights(mut self, weights: FeatureWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// One candidate that survived the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedComparison {
    pub candidate_id: Uuid,
    /// Position of the candidate in the input list.
    pub target_index: usize,
    pub similarity: ComparisonResult,
    pub matching_features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingMetadata {
    pub source_id: Uuid,
    /// Every candidate supplied, including ones that were skipped.
    pub total_candidates_considered: usize,
    /// Candidates at or above the threshold, before truncation.
    pub filtered_candidates: usize,
    /// Candidates dropped for decode, dimension or internal scoring failures.
    pub skipped_candidates: usize,
    pub processing_time_ms: u64,
    pub weights_used: WeightVector,
    pub similarity_threshold: f64,
    pub search_radius_expanded: bool,
    pub error_occurred: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of [`MatchRanker::rank`](super::MatchRanker::rank). Batch-level failures set
/// `metadata.error_occurred` instead of returning `Err`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub comparisons: Vec<RankedComparison>,
    pub metadata: RankingMetadata,
}

impl RankingOutcome {
    pub fn is_error(&self) -> bool {
        self.metadata.error_occurred
    }

    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.comparisons.len()
    }

    /// Best-scoring comparison, if any.
    pub fn top(&self) -> Option<&RankedComparison> {
        self.comparisons.first()
    }
}
