use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use tokio::sync::{Notify, Semaphore};
use tokio::time;
use tracing::{debug, info, warn};

use super::config::TaskRegistryConfig;
use super::error::{TaskError, TaskResult};
use super::types::{BackgroundTask, TaskLookup, TaskStatus, TaskSummary};

#[derive(Debug)]
struct TaskEntry {
    task: BackgroundTask,
    /// Distinguishes a resubmitted id from the run it replaced.
    generation: u64,
}

type TaskMap = Arc<RwLock<HashMap<String, TaskEntry>>>;

const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Tracks background jobs by id and runs them on a bounded pool.
///
/// Created once at startup and shared (usually behind an `Arc`). All state
/// transitions happen under one lock; a job's outcome is written only if its entry is
/// still the same run and still `running`, so a canceled task stays canceled.
///
/// Submitting requires a Tokio runtime.
pub struct TaskRegistry {
    config: TaskRegistryConfig,
    tasks: TaskMap,
    permits: Arc<Semaphore>,
    next_generation: AtomicU64,
    shutdown_initiated: Arc<AtomicBool>,
    reaper_running: Arc<AtomicBool>,
    reaper_wakeup: Arc<Notify>,
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new(TaskRegistryConfig::default())
    }
}

impl TaskRegistry {
    pub fn new(config: TaskRegistryConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_workers.max(1)));
        Self {
            config,
            tasks: Arc::new(RwLock::new(HashMap::new())),
            permits,
            next_generation: AtomicU64::new(0),
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
            reaper_running: Arc::new(AtomicBool::new(false)),
            reaper_wakeup: Arc::new(Notify::new()),
        }
    }

    pub fn config(&self) -> &TaskRegistryConfig {
        &self.config
    }

    /// Schedules blocking `work` and records the task as `running` immediately.
    ///
    /// The closure runs on Tokio's blocking pool once one of `max_workers` slots is free.
    /// `Ok` completes the task with its summary; `Err` or a panic fails it.
    pub fn submit<F, E>(&self, task_id: impl Into<String>, work: F) -> TaskResult<()>
    where
        F: FnOnce() -> Result<TaskSummary, E> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        self.spawn_tracked(task_id.into(), async move {
            match tokio::task::spawn_blocking(work).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => Err(format!("worker panicked: {e}")),
            }
        })
    }

    /// Like [`TaskRegistry::submit`] for async work. A panic inside `work` fails the task.
    pub fn submit_async<Fut, E>(&self, task_id: impl Into<String>, work: Fut) -> TaskResult<()>
    where
        Fut: Future<Output = Result<TaskSummary, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        self.spawn_tracked(task_id.into(), async move {
            match tokio::spawn(work).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => Err(format!("worker panicked: {e}")),
            }
        })
    }

    pub fn get_status(&self, task_id: &str) -> TaskLookup {
        match self.tasks.read().get(task_id) {
            Some(entry) => TaskLookup::Found(entry.task.clone()),
            None => TaskLookup::NotFound,
        }
    }

    /// Marks a running task `canceled`. Returns `false` for unknown or finished tasks.
    ///
    /// Advisory only: a job already executing is not interrupted, but its outcome is
    /// discarded. A job still waiting for a worker slot is never started.
    pub fn cancel(&self, task_id: &str) -> bool {
        self.try_cancel(task_id).is_ok()
    }

    /// [`TaskRegistry::cancel`] with the reason for refusal.
    pub fn try_cancel(&self, task_id: &str) -> TaskResult<BackgroundTask> {
        let mut tasks = self.tasks.write();
        let entry = tasks.get_mut(task_id).ok_or_else(|| TaskError::NotFound {
            id: task_id.to_string(),
        })?;

        if entry.task.status != TaskStatus::Running {
            return Err(TaskError::NotRunning {
                id: task_id.to_string(),
                status: entry.task.status,
            });
        }

        entry.task.status = TaskStatus::Canceled;
        entry.task.completed_at = Some(Utc::now());
        info!(task_id, "Task canceled");
        Ok(entry.task.clone())
    }

    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes terminal tasks that finished more than `retention` ago. Running tasks are
    /// never evicted. Returns the number removed.
    pub fn evict_expired(&self) -> usize {
        evict_finished_before(&self.tasks, retention_cutoff(&self.config))
    }

    /// Starts the retention reaper. Returns `None` if it is already running.
    pub fn start_reaper(&self) -> Option<tokio::task::JoinHandle<()>> {
        if self.reaper_running.swap(true, Ordering::AcqRel) {
            return None;
        }

        let config = self.config.clone();
        let tasks = Arc::clone(&self.tasks);
        let shutdown_initiated = Arc::clone(&self.shutdown_initiated);
        let reaper_running = Arc::clone(&self.reaper_running);
        let wakeup = Arc::clone(&self.reaper_wakeup);

        Some(tokio::spawn(async move {
            let mut interval = time::interval(config.sweep_interval.max(MIN_SWEEP_INTERVAL));
            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = wakeup.notified() => {}
                }
                if shutdown_initiated.load(Ordering::Acquire) {
                    break;
                }

                let evicted = evict_finished_before(&tasks, retention_cutoff(&config));
                if evicted > 0 {
                    debug!(evicted, "Evicted expired tasks");
                }
            }
            reaper_running.store(false, Ordering::Release);
        }))
    }

    /// Stops the reaper (idempotent). Submitted jobs are left to finish.
    pub fn shutdown(&self) {
        if self.shutdown_initiated.swap(true, Ordering::AcqRel) {
            return;
        }
        self.reaper_wakeup.notify_one();
        info!("Task registry shutting down");
    }

    pub fn is_shutdown_initiated(&self) -> bool {
        self.shutdown_initiated.load(Ordering::Acquire)
    }

    fn spawn_tracked<Fut>(&self, id: String, work: Fut) -> TaskResult<()>
    where
        Fut: Future<Output = Result<TaskSummary, String>> + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        {
            let mut tasks = self.tasks.write();
            if let Some(existing) = tasks.get(&id)
                && existing.task.status == TaskStatus::Running
            {
                return Err(TaskError::AlreadyRunning { id });
            }
            tasks.insert(
                id.clone(),
                TaskEntry {
                    task: BackgroundTask::running(id.clone()),
                    generation,
                },
            );
        }
        info!(task_id = %id, "Task submitted");

        let tasks = Arc::clone(&self.tasks);
        let permits = Arc::clone(&self.permits);
        tokio::spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    record_outcome(&tasks, &id, generation, Err(e.to_string()));
                    return;
                }
            };

            if !is_current_run(&tasks, &id, generation) {
                debug!(task_id = %id, "Skipping task canceled before start");
                return;
            }

            debug!(task_id = %id, "Task started");
            let outcome = work.await;
            record_outcome(&tasks, &id, generation, outcome);
        });

        Ok(())
    }
}

fn is_current_run(tasks: &TaskMap, id: &str, generation: u64) -> bool {
    tasks
        .read()
        .get(id)
        .is_some_and(|e| e.generation == generation && e.task.status == TaskStatus::Running)
}

fn record_outcome(
    tasks: &TaskMap,
    id: &str,
    generation: u64,
    outcome: Result<TaskSummary, String>,
) {
    let mut tasks = tasks.write();
    let Some(entry) = tasks
        .get_mut(id)
        .filter(|e| e.generation == generation && e.task.status == TaskStatus::Running)
    else {
        debug!(task_id = id, "Discarding outcome of canceled task");
        return;
    };

    entry.task.completed_at = Some(Utc::now());
    match outcome {
        Ok(summary) => {
            entry.task.status = TaskStatus::Completed;
            entry.task.result_summary = Some(summary);
            info!(
                task_id = id,
                duration_ms = entry.task.duration().num_milliseconds(),
                "Task completed"
            );
        }
        Err(error) => {
            warn!(task_id = id, error = %error, "Task failed");
            entry.task.status = TaskStatus::Failed;
            entry.task.error = Some(error);
        }
    }
}

fn retention_cutoff(config: &TaskRegistryConfig) -> DateTime<Utc> {
    TimeDelta::from_std(config.retention)
        .ok()
        .and_then(|retention| Utc::now().checked_sub_signed(retention))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn evict_finished_before(tasks: &TaskMap, cutoff: DateTime<Utc>) -> usize {
    let mut tasks = tasks.write();
    let before = tasks.len();
    tasks.retain(|_, entry| {
        !(entry.task.status.is_terminal()
            && entry.task.completed_at.is_some_and(|done| done <= cutoff))
    });
    before - tasks.len()
}
