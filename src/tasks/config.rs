use std::time::Duration;

/// Default number of tasks allowed to run at once.
pub const DEFAULT_TASK_WORKERS: usize = 5;
/// Default time a finished task stays queryable.
pub const DEFAULT_TASK_RETENTION_SECS: u64 = 60 * 60;
/// Default reaper sweep interval.
pub const DEFAULT_TASK_SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Worker pool and retention settings for [`TaskRegistry`](super::TaskRegistry).
pub struct TaskRegistryConfig {
    /// Maximum concurrently running tasks; further submissions queue.
    pub max_workers: usize,
    /// How long a task stays in the registry after reaching a terminal state.
    pub retention: Duration,
    /// How often the reaper evicts expired entries.
    pub sweep_interval: Duration,
}

impl Default for TaskRegistryConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_TASK_WORKERS,
            retention: Duration::from_secs(DEFAULT_TASK_RETENTION_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_TASK_SWEEP_INTERVAL_SECS),
        }
    }
}
