//! Fake data provider used to exercise the server without a database

use async_trait::async_trait;
use dashboard_application::{Provider, ProviderError, QueryError, QueryList, QueryTask, fn_query};
use dashboard_domain::ResultSet;
use std::sync::Arc;

/// Provider returning fixed demo data
#[derive(Debug, Default)]
pub struct FakeProvider;

impl FakeProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Provider for FakeProvider {
    fn id(&self) -> &str {
        "fake"
    }

    async fn login(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn register(&self) -> Result<QueryList, ProviderError> {
        let name: Arc<dyn QueryTask> = Arc::new(fn_query(|_cancel, _range| async {
            Ok::<_, QueryError>(ResultSet::single("Name", "Hydra"))
        }));
        let heads: Arc<dyn QueryTask> = Arc::new(fn_query(|_cancel, _range| async {
            Ok::<_, QueryError>(ResultSet::single("Heads", 8))
        }));

        Ok(QueryList::from([
            ("Name".to_string(), name),
            ("Heads".to_string(), heads),
        ]))
    }
}
