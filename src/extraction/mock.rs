use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::{ExtractionError, ExtractionResult};
use super::extractor::{ExtractedFeatures, FeatureExtractor};

/// Canned extractor keyed by exact image bytes. Unknown images yield "no pet detected".
#[derive(Default)]
pub struct MockFeatureExtractor {
    responses: RwLock<HashMap<Vec<u8>, ExtractionResult<ExtractedFeatures>>>,
    calls: AtomicUsize,
}

impl MockFeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_features(self, image: impl Into<Vec<u8>>, features: ExtractedFeatures) -> Self {
        self.responses.write().insert(image.into(), Ok(features));
        self
    }

    pub fn with_error(self, image: impl Into<Vec<u8>>, error: ExtractionError) -> Self {
        self.responses.write().insert(image.into(), Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FeatureExtractor for MockFeatureExtractor {
    async fn extract(&self, image: &[u8]) -> ExtractionResult<Option<ExtractedFeatures>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if image.is_empty() {
            return Err(ExtractionError::EmptyImage);
        }
        match self.responses.read().get(image) {
            Some(Ok(features)) => Ok(Some(features.clone())),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(None),
        }
    }
}
