//! Feature-extraction seam: the vision model is an external collaborator.

pub mod error;
pub mod extractor;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::{ExtractionError, ExtractionResult};
pub use extractor::{ExtractedFeatures, FeatureExtractor};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockFeatureExtractor;
