//! HTTP server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Socket address to listen on (default: "0.0.0.0:8080")
    pub bind: String,
    /// Directory served for every path other than the search endpoint
    pub static_dir: PathBuf,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            static_dir: PathBuf::from("dist"),
        }
    }
}
