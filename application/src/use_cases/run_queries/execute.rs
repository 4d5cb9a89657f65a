//! Task execution wrapper
//!
//! Runs one task and turns its result into a [`TaskOutcome`]. Errors stop
//! here: a failed task yields an empty result set and its error is logged
//! with the task's name.

use std::time::{Duration, Instant};

use dashboard_domain::{DateRange, ResultSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ports::query_task::QueryTask;

/// What a single task contributed to the batch
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    /// Registry name of the task
    pub name: String,
    /// Contribution; empty when the task failed
    pub results: ResultSet,
    /// Error message if failed
    pub error: Option<String>,
    /// Whether the task gave up because the scope was cancelled
    pub cancelled: bool,
    /// Wall time from invocation to completion
    pub elapsed: Duration,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Invoke `task` for `range`, containing any failure.
pub async fn execute_task(
    name: &str,
    task: &dyn QueryTask,
    cancel: &CancellationToken,
    range: &DateRange,
) -> TaskOutcome {
    let started = Instant::now();
    debug!(query = %name, range = %range, "{} started", name);

    let result = task.execute(cancel, range).await;
    let elapsed = started.elapsed();

    match result {
        Ok(results) => {
            info!(query = %name, keys = results.len(), "{} took {:?}", name, elapsed);
            TaskOutcome {
                name: name.to_string(),
                results,
                error: None,
                cancelled: false,
                elapsed,
            }
        }
        Err(e) => {
            let cancelled = e.is_cancelled();
            if cancelled {
                info!(query = %name, "{} cancelled after {:?}", name, elapsed);
            } else {
                warn!(query = %name, error = %e, "Query {} failed with error {}", name, e);
            }
            TaskOutcome {
                name: name.to_string(),
                results: ResultSet::new(),
                error: Some(e.to_string()),
                cancelled,
                elapsed,
            }
        }
    }
}
