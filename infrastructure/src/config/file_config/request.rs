//! Request handling configuration from TOML (`[request]` section)

use dashboard_application::RequestConfig;
use dashboard_domain::DateFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRequestConfig {
    /// Encoding of begin/end in request bodies ("calendar" or "epoch")
    pub date_format: DateFormat,
    /// Per-request deadline in seconds (unset = no deadline)
    pub timeout_seconds: Option<u64>,
}

impl FileRequestConfig {
    /// Convert to the application-layer type
    pub fn to_request_config(&self) -> RequestConfig {
        let config = RequestConfig::default().with_date_format(self.date_format);
        match self.timeout_seconds {
            Some(seconds) => config.with_timeout(Duration::from_secs(seconds)),
            None => config,
        }
    }
}
