//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod providers;
mod request;
mod server;

pub use providers::{FileProvidersConfig, FileSqliteProviderConfig};
pub use request::FileRequestConfig;
pub use server::FileServerConfig;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("server.bind '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("sqlite provider id cannot be empty")]
    EmptyProviderId,

    #[error("sqlite provider id '{0}' is used more than once")]
    DuplicateProviderId(String),

    #[error("sqlite provider '{0}' has no database path")]
    EmptyDatabasePath(String),

    #[error("sqlite provider '{0}' has a query with an empty name")]
    EmptyQueryName(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP server settings
    pub server: FileServerConfig,
    /// Request decoding and deadline
    pub request: FileRequestConfig,
    /// Data providers
    pub providers: FileProvidersConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(0) = self.request.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigValidationError::InvalidBindAddress(
                self.server.bind.clone(),
            ));
        }

        let mut seen = HashSet::new();
        for provider in &self.providers.sqlite {
            if provider.id.trim().is_empty() {
                return Err(ConfigValidationError::EmptyProviderId);
            }
            if !seen.insert(provider.id.as_str()) {
                return Err(ConfigValidationError::DuplicateProviderId(
                    provider.id.clone(),
                ));
            }
            if provider.path.as_os_str().is_empty() {
                return Err(ConfigValidationError::EmptyDatabasePath(
                    provider.id.clone(),
                ));
            }
            if provider.queries.keys().any(|name| name.trim().is_empty()) {
                return Err(ConfigValidationError::EmptyQueryName(provider.id.clone()));
            }
        }

        Ok(())
    }
}
