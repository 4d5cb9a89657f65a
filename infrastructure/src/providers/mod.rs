//! Data provider adapters
//!
//! Each adapter implements the application's [`Provider`] port:
//!
//! - [`FakeProvider`]: fixed demo data, always logs in
//! - [`SqliteProvider`]: named scalar SQL queries over a date range

mod fake;
mod sqlite;

pub use fake::FakeProvider;
pub use sqlite::SqliteProvider;

use crate::config::FileProvidersConfig;
use dashboard_application::Provider;
use std::sync::Arc;

/// Instantiate the configured providers in registration order.
///
/// The fake provider (when enabled) comes first, then SQLite providers in
/// declaration order, so a SQLite query wins a name collision with it.
pub fn build_providers(config: &FileProvidersConfig) -> Vec<Arc<dyn Provider>> {
    let mut providers: Vec<Arc<dyn Provider>> = Vec::new();

    if config.fake {
        providers.push(Arc::new(FakeProvider::new()));
    }

    for sqlite in &config.sqlite {
        providers.push(Arc::new(SqliteProvider::from_config(sqlite)));
    }

    providers
}
