//! Per-request cancellation scope.

use std::time::Duration;

use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::info;

/// Owns the cancellation token of one inbound request.
///
/// The token is cancelled when the scope is dropped (the request future went
/// away, e.g. on client disconnect) or when the optional deadline passes.
/// Cancelling after the batch has completed has no effect on its result.
pub struct RequestScope {
    token: CancellationToken,
    _guard: DropGuard,
}

impl RequestScope {
    /// Scope without a deadline
    pub fn new() -> Self {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    /// Scope that cancels itself after `timeout`, if one is given.
    ///
    /// Must be called from within a Tokio runtime when `timeout` is `Some`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let scope = Self::new();
        if let Some(timeout) = timeout {
            let token = scope.token.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = token.cancelled() => {}
                    _ = tokio::time::sleep(timeout) => {
                        info!("Request deadline of {:?} reached, cancelling", timeout);
                        token.cancel();
                    }
                }
            });
        }
        scope
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}
