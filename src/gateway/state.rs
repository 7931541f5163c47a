use std::sync::Arc;

use crate::ledger::MatchLedger;
use crate::pipeline::{InMemoryCandidateSource, MatchPipeline};
use crate::ranking::MatchRanker;
use crate::tasks::TaskRegistry;

#[derive(Clone)]
pub struct HandlerState {
    pub registry: Arc<TaskRegistry>,

    pub ledger: Arc<MatchLedger>,

    /// Pet reports registered over HTTP; the pipeline reads candidates from here.
    pub reports: Arc<InMemoryCandidateSource>,

    pub pipeline: Arc<MatchPipeline>,
}

impl HandlerState {
    /// State with an empty report store and a default-configured pipeline over `ledger`.
    pub fn new(registry: Arc<TaskRegistry>, ledger: Arc<MatchLedger>) -> Self {
        let reports = Arc::new(InMemoryCandidateSource::new());
        let pipeline = Arc::new(MatchPipeline::new(
            MatchRanker::new(),
            ledger,
            reports.clone(),
        ));
        Self::with_pipeline(registry, reports, pipeline)
    }

    /// `pipeline` must read from `reports`; the ledger is taken from the pipeline.
    pub fn with_pipeline(
        registry: Arc<TaskRegistry>,
        reports: Arc<InMemoryCandidateSource>,
        pipeline: Arc<MatchPipeline>,
    ) -> Self {
        Self {
            registry,
            ledger: pipeline.ledger().clone(),
            reports,
            pipeline,
        }
    }
}
