//! Request parameters: payload decoding and deadline.
//!
//! [`RequestConfig`] groups the per-deployment settings that the request
//! handling path needs before and around a dispatch. The dispatch core itself
//! imposes no timeout; callers attach `timeout` to the request scope.

use dashboard_domain::DateFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Encoding of `begin`/`end` in request payloads.
    pub date_format: DateFormat,
    /// Deadline after which the request scope is cancelled.
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    // ==================== Builder Methods ====================

    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.date_format = format;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }
}
