//! Configuration file loading for dashboard
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DASHBOARD_*` environment variables (`__` separates nested keys)
//! 2. `--config <path>` specified file
//! 3. Project root: `./dashboard.toml` or `./.dashboard.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/dashboard/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileProvidersConfig, FileRequestConfig, FileServerConfig,
    FileSqliteProviderConfig,
};
pub use loader::ConfigLoader;
