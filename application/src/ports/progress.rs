//! Progress notification port
//!
//! Defines the interface for reporting progress while a batch of query tasks
//! runs. Purely observational: nothing here influences the merged result.

use std::time::Duration;

/// Callback for progress updates during a dispatch/collect cycle
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console bar, request logs, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once every task of the batch has been launched
    fn on_batch_start(&self, total_tasks: usize);

    /// Called when a task finishes, successfully or not
    fn on_task_complete(&self, name: &str, success: bool, elapsed: Duration);

    /// Called when the collector reaches its terminal state
    fn on_batch_complete(&self, _collected_keys: usize, _cancelled: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_batch_start(&self, _total_tasks: usize) {}
    fn on_task_complete(&self, _name: &str, _success: bool, _elapsed: Duration) {}
}
