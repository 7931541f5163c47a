use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Free-form result payload of a completed task (for example `{"matches_found": 3}`).
pub type TaskSummary = serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Running,
    Completed,
    Failed,
    Canceled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Canceled => "canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Running)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one tracked task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundTask {
    pub id: String,
    pub status: TaskStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result_summary: Option<TaskSummary>,
    pub error: Option<String>,
}

impl BackgroundTask {
    pub(crate) fn running(id: String) -> Self {
        Self {
            id,
            status: TaskStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            result_summary: None,
            error: None,
        }
    }

    /// Time from submission to completion, or to now while still running.
    pub fn duration(&self) -> TimeDelta {
        self.completed_at.unwrap_or_else(Utc::now) - self.started_at
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 1000.0
    }
}

/// Result of a status lookup. A missing id is a normal answer, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskLookup {
    Found(BackgroundTask),
    NotFound,
}

impl TaskLookup {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskLookup::NotFound)
    }

    pub fn into_option(self) -> Option<BackgroundTask> {
        match self {
            TaskLookup::Found(task) => Some(task),
            TaskLookup::NotFound => None,
        }
    }
}
