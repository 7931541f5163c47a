use thiserror::Error;

use super::types::TaskStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task not found: {id}")]
    NotFound { id: String },

    #[error("task {id} is not running (status: {status})")]
    NotRunning { id: String, status: TaskStatus },

    #[error("task {id} is already running")]
    AlreadyRunning { id: String },
}

impl TaskError {
    pub fn kind(&self) -> &'static str {
        match self {
            TaskError::NotFound { .. } => "not_found",
            TaskError::NotRunning { .. } => "not_running",
            TaskError::AlreadyRunning { .. } => "already_running",
        }
    }
}

pub type TaskResult<T> = Result<T, TaskError>;
