use async_trait::async_trait;

use super::error::ExtractionResult;
use crate::model::{Attributes, FeatureVector};

/// What the vision model reports for a photo containing a pet.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFeatures {
    pub species: String,
    pub attributes: Attributes,
    pub feature_vector: FeatureVector,
}

#[async_trait]
/// Turns an uploaded image into matching features.
///
/// Implementations are treated as slow and CPU-bound; callers run them through the
/// [`TaskRegistry`](crate::tasks::TaskRegistry) rather than on the request path.
pub trait FeatureExtractor: Send + Sync {
    /// Returns `Ok(None)` when no pet is detected in the image.
    async fn extract(&self, image: &[u8]) -> ExtractionResult<Option<ExtractedFeatures>>;
}
