//! Run Queries use case
//!
//! Runs every registered query over one date range and merges the results:
//!
//! 1. **Dispatch**: one `(name, task)` pair per registry entry
//! 2. **Execute**: each pair runs on its own Tokio task, bound to the shared
//!    range and the request's cancellation token
//! 3. **Collect**: every contribution is merged into one accumulator; the
//!    result is returned once all tasks finished or cancellation was observed
//!
//! A failing task only removes its own keys from the result. On cancellation
//! the in-flight tasks are aborted and the partial accumulator is returned.

mod collect;
mod dispatch;
mod execute;
mod scope;

pub use collect::Collector;
pub use dispatch::Dispatcher;
pub use execute::{TaskOutcome, execute_task};
pub use scope::RequestScope;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashboard_domain::{DateFormat, DateRange, DomainError, ResultSet, parse_date_range};
use thiserror::Error;
use tokio::task::{Id, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::registry::QueryRegistry;

/// Errors surfaced to the caller of a request
///
/// Task failures never fail a batch and have no variant here.
#[derive(Error, Debug)]
pub enum RunQueriesError {
    #[error(transparent)]
    MalformedInput(#[from] DomainError),
}

/// Merged result of one batch plus what happened to each task
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Union of every contribution merged before the collector finished
    pub results: ResultSet,
    /// Names of tasks that succeeded
    pub succeeded: Vec<String>,
    /// `(name, error)` for tasks that failed, panicked or were cancelled
    pub failed: Vec<(String, String)>,
    /// Whether the collector stopped because the scope was cancelled
    pub cancelled: bool,
    /// Wall time of the whole batch
    pub elapsed: Duration,
}

/// Use case for running every registered query
pub struct RunQueriesUseCase {
    registry: Arc<QueryRegistry>,
}

impl RunQueriesUseCase {
    pub fn new(registry: Arc<QueryRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &QueryRegistry {
        &self.registry
    }

    /// Run the batch and return only the merged result set
    pub async fn execute(&self, range: DateRange, cancel: &CancellationToken) -> ResultSet {
        self.execute_with_progress(range, cancel, &NoProgress)
            .await
            .results
    }

    /// Decode `payload` and run the batch.
    ///
    /// A payload that does not decode fails with
    /// [`RunQueriesError::MalformedInput`] before any task is launched.
    pub async fn execute_request(
        &self,
        payload: &[u8],
        format: DateFormat,
        cancel: &CancellationToken,
        progress: &dyn ProgressNotifier,
    ) -> Result<BatchOutcome, RunQueriesError> {
        let range = parse_date_range(payload, format).inspect_err(|e| {
            warn!(error = %e, "Rejecting request before dispatch");
        })?;

        Ok(self.execute_with_progress(range, cancel, progress).await)
    }

    /// Run the batch with progress callbacks
    pub async fn execute_with_progress(
        &self,
        range: DateRange,
        cancel: &CancellationToken,
        progress: &dyn ProgressNotifier,
    ) -> BatchOutcome {
        let started = Instant::now();
        let collector = Arc::new(Collector::new());
        let mut join_set = JoinSet::new();
        let mut names = HashMap::new();

        for (name, task) in self.registry.dispatch(cancel) {
            let collector = Arc::clone(&collector);
            let cancel = cancel.clone();
            let task_name = name.clone();

            let handle = join_set.spawn(async move {
                let mut outcome = execute_task(&task_name, task.as_ref(), &cancel, &range).await;
                collector.absorb(&outcome.name, std::mem::take(&mut outcome.results));
                outcome
            });
            names.insert(handle.id(), name);
        }

        let total = join_set.len();
        debug!(tasks = total, range = %range, "Dispatched queries");
        progress.on_batch_start(total);

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        let mut cancelled = false;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = join_set.join_next() => Some(result),
            };

            let Some(result) = next else {
                cancelled = true;
                break;
            };
            let Some(result) = result else {
                break;
            };
            record(result, &names, progress, &mut succeeded, &mut failed);
        }

        if cancelled {
            // Tasks that finished alongside the cancellation already
            // merged their keys; account for them before aborting the rest.
            while let Some(result) = join_set.try_join_next() {
                record(result, &names, progress, &mut succeeded, &mut failed);
            }
            info!(
                in_flight = join_set.len(),
                "Batch cancelled, returning partial results"
            );
            join_set.abort_all();
        }

        let absorbed = collector.absorbed();
        let results = collector.finish();
        let elapsed = started.elapsed();
        progress.on_batch_complete(results.len(), cancelled);
        info!(
            queries = total,
            absorbed,
            keys = results.len(),
            failed = failed.len(),
            "Batch took {:?}",
            elapsed
        );

        BatchOutcome {
            results,
            succeeded,
            failed,
            cancelled,
            elapsed,
        }
    }
}

/// Route one joined task into the success or failure list
fn record(
    result: Result<TaskOutcome, JoinError>,
    names: &HashMap<Id, String>,
    progress: &dyn ProgressNotifier,
    succeeded: &mut Vec<String>,
    failed: &mut Vec<(String, String)>,
) {
    match result {
        Ok(outcome) => {
            progress.on_task_complete(&outcome.name, outcome.is_success(), outcome.elapsed);
            match outcome.error {
                None => succeeded.push(outcome.name),
                Some(error) => failed.push((outcome.name, error)),
            }
        }
        Err(e) => {
            let name = names
                .get(&e.id())
                .cloned()
                .unwrap_or_else(|| "<unknown>".to_string());
            warn!(query = %name, "Query {} did not complete: {}", name, e);
            progress.on_task_complete(&name, false, Duration::ZERO);
            failed.push((name, e.to_string()));
        }
    }
}
