//! Fan-in: the shared result accumulator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashboard_domain::ResultSet;
use tracing::debug;

/// Accumulator merged into by every task of one batch.
///
/// Writers take the lock one at a time; a key written by two tasks keeps
/// whichever value was merged last.
#[derive(Debug, Default)]
pub struct Collector {
    accumulator: Mutex<ResultSet>,
    absorbed: AtomicUsize,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one task's contribution.
    pub fn absorb(&self, source: &str, results: ResultSet) {
        let overwritten = self.lock().merge(results);
        self.absorbed.fetch_add(1, Ordering::SeqCst);

        for key in overwritten {
            debug!(query = %source, key = %key, "Result key overwritten by a later task");
        }
    }

    /// Number of contributions merged so far (empty ones included)
    pub fn absorbed(&self) -> usize {
        self.absorbed.load(Ordering::SeqCst)
    }

    /// Copy of the accumulator as it stands
    pub fn snapshot(&self) -> ResultSet {
        self.lock().clone()
    }

    /// Take the merged result, copying only if a task still holds a reference.
    pub fn finish(self: Arc<Self>) -> ResultSet {
        match Arc::try_unwrap(self) {
            Ok(collector) => collector
                .accumulator
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared.snapshot(),
        }
    }

    // A panic while holding the lock can only interrupt `merge`, which leaves
    // the map valid, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, ResultSet> {
        self.accumulator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
