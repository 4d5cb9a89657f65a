//! Infrastructure layer for dashboard
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileProvidersConfig, FileRequestConfig,
    FileServerConfig, FileSqliteProviderConfig,
};
pub use providers::{FakeProvider, SqliteProvider, build_providers};
