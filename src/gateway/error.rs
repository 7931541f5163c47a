use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::ledger::LedgerError;
use crate::pipeline::PipelineError;
use crate::tasks::TaskError;

/// Response header carrying the machine-readable error kind.
pub const PETRADAR_ERROR_HEADER: &str = "x-petradar-error";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<TaskError> for GatewayError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound { .. } => GatewayError::NotFound(err.to_string()),
            TaskError::NotRunning { .. } => GatewayError::InvalidRequest(err.to_string()),
            TaskError::AlreadyRunning { .. } => GatewayError::Conflict(err.to_string()),
        }
    }
}

impl From<LedgerError> for GatewayError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound { .. } => GatewayError::NotFound(err.to_string()),
            LedgerError::InvalidTransition { .. } => GatewayError::Conflict(err.to_string()),
            LedgerError::InvalidSimilarity { .. } => GatewayError::InvalidRequest(err.to_string()),
        }
    }
}

impl From<PipelineError> for GatewayError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::FoundPetNotFound { .. } => GatewayError::NotFound(err.to_string()),
            PipelineError::NoPetDetected { .. } => GatewayError::InvalidRequest(err.to_string()),
            PipelineError::Task(e) => e.into(),
            PipelineError::Ledger(e) => e.into(),
            PipelineError::ExtractorUnavailable
            | PipelineError::Ranking(_)
            | PipelineError::Source(_)
            | PipelineError::Extraction(_) => GatewayError::InternalError(err.to_string()),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            GatewayError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            GatewayError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(PETRADAR_ERROR_HEADER, HeaderValue::from_static(kind));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
