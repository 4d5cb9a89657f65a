//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One SQLite database and the named scalar queries run against it.
///
/// Each query may reference `?1` (begin) and `?2` (end), bound as
/// `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSqliteProviderConfig {
    /// Provider id used in logs
    pub id: String,
    /// Path of the database file
    pub path: PathBuf,
    /// Query name → SQL
    #[serde(default)]
    pub queries: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Enable the built-in demo provider (Name / Heads)
    pub fake: bool,
    /// SQLite-backed providers, in registration order
    pub sqlite: Vec<FileSqliteProviderConfig>,
}
