//! Fan-out: lazy production of `(name, task)` pairs.

use std::iter::FusedIterator;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::ports::query_task::QueryTask;
use crate::registry;

/// One item per registry entry, in unspecified order.
///
/// Production is cheap and never waits on task execution. Once the request's
/// cancellation token has fired the dispatcher stops emitting and stays
/// exhausted. Consumed by value, so a dispatch cannot be restarted.
pub struct Dispatcher<'a> {
    entries: registry::Iter<'a>,
    cancel: CancellationToken,
    emitted: usize,
    done: bool,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn new(entries: registry::Iter<'a>, cancel: CancellationToken) -> Self {
        Self {
            entries,
            cancel,
            emitted: 0,
            done: false,
        }
    }
}

impl Iterator for Dispatcher<'_> {
    type Item = (String, Arc<dyn QueryTask>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.cancel.is_cancelled() {
            debug!(emitted = self.emitted, "Dispatch was cancelled");
            self.done = true;
            return None;
        }
        match self.entries.next() {
            Some((name, task)) => {
                self.emitted += 1;
                Some((name.to_string(), Arc::clone(task)))
            }
            None => {
                self.done = true;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, self.entries.size_hint().1)
        }
    }
}

impl FusedIterator for Dispatcher<'_> {}
