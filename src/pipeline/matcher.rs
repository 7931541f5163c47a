use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::{PipelineError, PipelineResult};
use super::source::CandidateSource;
use crate::constants::DEFAULT_CANDIDATE_LIMIT;
use crate::extraction::{ExtractedFeatures, FeatureExtractor};
use crate::ledger::{MatchLedger, UpsertAction, UpsertOutcome};
use crate::ranking::{MatchRanker, RankOptions};
use crate::tasks::TaskRegistry;

/// Task id prefix for match searches triggered by a found-pet report.
pub const FIND_MATCHES_TASK_PREFIX: &str = "find_matches_";
/// Task id prefix for photo feature extraction.
pub const PROCESS_PHOTO_TASK_PREFIX: &str = "proc_photo_";

pub fn find_matches_task_id(found_pet_id: Uuid) -> String {
    format!("{FIND_MATCHES_TASK_PREFIX}{found_pet_id}")
}

pub fn process_photo_task_id(photo_id: &str) -> String {
    format!("{PROCESS_PHOTO_TASK_PREFIX}{photo_id}")
}

/// Ranks a found pet against stored lost pets and records the results in the ledger.
pub struct MatchPipeline {
    ranker: MatchRanker,
    ledger: Arc<MatchLedger>,
    source: Arc<dyn CandidateSource>,
    extractor: Option<Arc<dyn FeatureExtractor>>,
    candidate_limit: usize,
    rank_options: RankOptions,
}

impl MatchPipeline {
    pub fn new(
        ranker: MatchRanker,
        ledger: Arc<MatchLedger>,
        source: Arc<dyn CandidateSource>,
    ) -> Self {
        Self {
            ranker,
            ledger,
            source,
            extractor: None,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            rank_options: RankOptions::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn FeatureExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = limit;
        self
    }

    pub fn with_rank_options(mut self, options: RankOptions) -> Self {
        self.rank_options = options;
        self
    }

    pub fn ledger(&self) -> &Arc<MatchLedger> {
        &self.ledger
    }

    pub fn ranker(&self) -> &MatchRanker {
        &self.ranker
    }

    /// Ranks lost pets of the same species against `found_pet_id` and upserts a match
    /// for every comparison that cleared the threshold.
    ///
    /// No lost candidates is not an error: the result is simply empty.
    pub fn find_matches_for_found_pet(
        &self,
        found_pet_id: Uuid,
    ) -> PipelineResult<Vec<UpsertOutcome>> {
        let found = self
            .source
            .found_pet(found_pet_id)?
            .ok_or(PipelineError::FoundPetNotFound { id: found_pet_id })?;
        let candidates = self
            .source
            .lost_candidates(found.species(), self.candidate_limit)?;

        if candidates.is_empty() {
            info!(%found_pet_id, "No lost pets to compare against");
            return Ok(Vec::new());
        }

        let outcome = self.ranker.rank(&found, &candidates, &self.rank_options);
        if outcome.is_error() {
            let reason = outcome
                .metadata
                .error
                .unwrap_or_else(|| "unknown ranking failure".to_string());
            return Err(PipelineError::Ranking(reason));
        }

        let mut upserted = Vec::with_capacity(outcome.comparisons.len());
        for comparison in outcome.comparisons {
            let result = self.ledger.upsert_tracked(
                comparison.candidate_id,
                found_pet_id,
                comparison.similarity.overall,
                comparison.matching_features,
            )?;
            debug!(
                match_id = %result.record.id,
                action = result.action.as_str(),
                "Recorded match"
            );
            upserted.push(result);
        }

        info!(
            %found_pet_id,
            considered = outcome.metadata.total_candidates_considered,
            matches = upserted.len(),
            "Match search completed"
        );
        Ok(upserted)
    }

    /// Runs [`MatchPipeline::find_matches_for_found_pet`] on the task pool. Returns the
    /// task id to poll.
    pub fn submit_find_matches(
        self: &Arc<Self>,
        registry: &TaskRegistry,
        found_pet_id: Uuid,
    ) -> PipelineResult<String> {
        let task_id = find_matches_task_id(found_pet_id);
        let pipeline = Arc::clone(self);

        registry.submit(task_id.clone(), move || {
            pipeline
                .find_matches_for_found_pet(found_pet_id)
                .map(|records| {
                    let count = |action: UpsertAction| {
                        records.iter().filter(|r| r.action == action).count()
                    };
                    json!({
                        "found_pet_id": found_pet_id,
                        "matches_found": records.len(),
                        "created": count(UpsertAction::Created),
                        "improved": count(UpsertAction::Improved),
                    })
                })
        })?;

        Ok(task_id)
    }

    /// Extracts features from `image` on the task pool. The task fails when no pet is
    /// detected.
    pub fn submit_photo_processing(
        &self,
        registry: &TaskRegistry,
        photo_id: &str,
        image: Vec<u8>,
    ) -> PipelineResult<String> {
        let extractor = self
            .extractor
            .clone()
            .ok_or(PipelineError::ExtractorUnavailable)?;
        let task_id = process_photo_task_id(photo_id);
        let photo_id = photo_id.to_string();

        registry.submit_async(task_id.clone(), async move {
            let features = extract_pet(extractor.as_ref(), &photo_id, &image).await?;
            Ok::<_, PipelineError>(json!({
                "photo_id": photo_id,
                "species": features.species,
                "attributes": features.attributes,
                "feature_dim": features.feature_vector.dim(),
            }))
        })?;

        Ok(task_id)
    }
}

/// Runs the extractor and turns "no pet detected" into an error.
pub async fn extract_pet(
    extractor: &dyn FeatureExtractor,
    photo_id: &str,
    image: &[u8],
) -> PipelineResult<ExtractedFeatures> {
    let features = extractor
        .extract(image)
        .await?
        .ok_or_else(|| PipelineError::NoPetDetected {
            photo_id: photo_id.to_string(),
        })?;

    info!(
        photo_id,
        species = %features.species,
        dim = features.feature_vector.dim(),
        "Features extracted"
    );
    Ok(features)
}
