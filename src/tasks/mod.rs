//! Background task registry: id-addressed jobs on a bounded worker pool with status
//! polling, advisory cancellation and retention-based eviction.

pub mod config;
pub mod error;
pub mod registry;
pub mod types;


pub use config::{
    DEFAULT_TASK_RETENTION_SECS, DEFAULT_TASK_SWEEP_INTERVAL_SECS, DEFAULT_TASK_WORKERS,
    TaskRegistryConfig,
};
pub use error::{TaskError, TaskResult};
pub use registry::TaskRegistry;
pub use types::{BackgroundTask, TaskLookup, TaskStatus, TaskSummary};
