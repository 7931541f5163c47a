use std::cmp::Ordering;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::model::{Candidate, GeoDistance, Haversine, PetProfile};
use crate::scoring::{
    ComparisonResult, ScoringError, ScoringResult, SimilarityScorer, UnusableReason,
    WeightVector, matching_features,
};

use super::types::{RankOptions, RankedComparison, RankerConfig, RankingMetadata, RankingOutcome};

/// Scores a source report against many candidates, keeps those above the threshold and
/// orders them best first.
///
/// Runs sequentially on the calling thread. Wrap it in a
/// [`TaskRegistry`](crate::tasks::TaskRegistry) job to keep it off the request path.
#[derive(Debug, Clone)]
pub struct MatchRanker<D: GeoDistance = Haversine> {
    scorer: SimilarityScorer<D>,
    config: RankerConfig,
}

impl MatchRanker<Haversine> {
    pub fn new() -> Self {
        Self::with_scorer(SimilarityScorer::new(), RankerConfig::default())
    }
}

impl Default for MatchRanker<Haversine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: GeoDistance> MatchRanker<D> {
    pub fn with_scorer(scorer: SimilarityScorer<D>, config: RankerConfig) -> Self {
        Self { scorer, config }
    }

    pub fn scorer(&self) -> &SimilarityScorer<D> {
        &self.scorer
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Ranks `candidates` against `source`.
    ///
    /// Never fails: an empty or undecodable source, or an empty candidate list, produces an
    /// empty outcome with `metadata.error_occurred` set. A candidate that cannot be scored is
    /// logged and dropped; it still counts toward `total_candidates_considered`.
    pub fn rank(
        &self,
        source: &Candidate,
        candidates: &[Candidate],
        options: &RankOptions,
    ) -> RankingOutcome {
        let start = Instant::now();
        let weights = self
            .scorer
            .normalize_weights(&options.weights.unwrap_or_default());
        let threshold = options.threshold.unwrap_or(self.config.similarity_threshold);
        let max_results = options.max_results.or(self.config.max_results);

        let mut metadata = RankingMetadata {
            source_id: source.id,
            total_candidates_considered: candidates.len(),
            filtered_candidates: 0,
            skipped_candidates: 0,
            processing_time_ms: 0,
            weights_used: weights,
            similarity_threshold: threshold,
            search_radius_expanded: false,
            error_occurred: false,
            error: None,
        };

        let source_profile = match self.prepare_source(source, candidates) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(source_id = %source.id, error = %e, "Ranking aborted");
                metadata.error_occurred = true;
                metadata.error = Some(e.to_string());
                metadata.processing_time_ms = elapsed_ms(start);
                return RankingOutcome {
                    comparisons: Vec::new(),
                    metadata,
                };
            }
        };

        debug!(
            source_id = %source.id,
            num_candidates = candidates.len(),
            threshold,
            "Ranking candidates"
        );

        let mut comparisons = Vec::new();
        for (index, candidate) in candidates.iter().enumerate() {
            let similarity = match self.score_candidate(&source_profile, candidate, &weights) {
                Ok(similarity) => similarity,
                Err(e) => {
                    warn!(
                        candidate_id = %candidate.id,
                        kind = e.kind(),
                        error = %e,
                        "Dropping candidate"
                    );
                    metadata.skipped_candidates += 1;
                    continue;
                }
            };

            if similarity.overall >= threshold {
                comparisons.push(RankedComparison {
                    candidate_id: candidate.id,
                    target_index: index,
                    similarity,
                    matching_features: matching_features(
                        source_profile.attributes.as_ref(),
                        candidate.attributes.as_ref(),
                    ),
                });
            }
        }

        // Stable: equal scores keep input order.
        comparisons.sort_by(|a, b| {
            b.similarity
                .overall
                .partial_cmp(&a.similarity.overall)
                .unwrap_or(Ordering::Equal)
        });

        metadata.filtered_candidates = comparisons.len();
        if let Some(max) = max_results {
            comparisons.truncate(max);
        }
        metadata.processing_time_ms = elapsed_ms(start);

        info!(
            source_id = %source.id,
            considered = metadata.total_candidates_considered,
            filtered = metadata.filtered_candidates,
            skipped = metadata.skipped_candidates,
            returned = comparisons.len(),
            "Ranking completed"
        );

        RankingOutcome {
            comparisons,
            metadata,
        }
    }

    /// Scores one candidate, turning every unusable outcome into a [`ScoringError`].
    pub fn score_candidate(
        &self,
        source: &PetProfile,
        candidate: &Candidate,
        weights: &WeightVector,
    ) -> ScoringResult<ComparisonResult> {
        let profile = candidate.decode(self.config.embedding_dim)?;
        let result = self.scorer.compare_normalized(source, &profile, weights);

        match result.unusable {
            Some(UnusableReason::DimensionMismatch {
                source_dim,
                candidate_dim,
            }) => Err(ScoringError::DimensionMismatch {
                expected: source_dim,
                actual: candidate_dim,
            }),
            None if !result.is_finite() => Err(ScoringError::InternalScoring {
                reason: format!("non-finite score: {result:?}"),
            }),
            None => Ok(result),
        }
    }

    fn prepare_source(
        &self,
        source: &Candidate,
        candidates: &[Candidate],
    ) -> ScoringResult<PetProfile> {
        if source.embedding.is_empty() {
            return Err(ScoringError::EmptyInput {
                reason: "source has no feature vector".to_string(),
            });
        }
        if candidates.is_empty() {
            return Err(ScoringError::EmptyInput {
                reason: "no candidates supplied".to_string(),
            });
        }

        let profile = source.decode(self.config.embedding_dim)?;
        if profile.feature_vector.is_zero() {
            debug!(source_id = %source.id, "Source feature vector is all zeros");
        }
        Ok(profile)
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

