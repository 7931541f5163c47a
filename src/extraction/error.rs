use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("image is empty")]
    EmptyImage,

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("feature extraction failed: {0}")]
    Model(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;
