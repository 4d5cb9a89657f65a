//! Query Registry
//!
//! The [`QueryRegistry`] maps query names to tasks. It is built once at
//! startup by logging into every provider and merging the name → task
//! mappings they register, then shared read-only by every request.
//!
//! # Build Process
//!
//! 1. Providers are visited in the order given
//! 2. Each provider's `login()` is called; any failure aborts startup
//! 3. Each provider's `register()` is called; any failure aborts startup
//! 4. Mappings are merged, a later provider replacing an earlier one's task
//!    when both register the same name (logged, not an error)

use std::collections::HashMap;
use std::collections::hash_map;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ports::provider::{Provider, ProviderError};
use crate::ports::query_task::QueryTask;
use crate::use_cases::run_queries::Dispatcher;

/// Fatal errors while populating the registry
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Error logging in to provider '{provider}': {source}")]
    Login {
        provider: String,
        #[source]
        source: ProviderError,
    },

    #[error("Error registering queries from provider '{provider}': {source}")]
    Register {
        provider: String,
        #[source]
        source: ProviderError,
    },
}

impl StartupError {
    /// Id of the provider that failed
    pub fn provider(&self) -> &str {
        match self {
            StartupError::Login { provider, .. } | StartupError::Register { provider, .. } => {
                provider
            }
        }
    }
}

struct Entry {
    task: Arc<dyn QueryTask>,
    provider: String,
}

/// Immutable name → task mapping
#[derive(Default)]
pub struct QueryRegistry {
    entries: HashMap<String, Entry>,
}

impl QueryRegistry {
    /// Log into every provider in order and merge their registrations.
    pub async fn build(providers: &[Arc<dyn Provider>]) -> Result<Self, StartupError> {
        let started = Instant::now();
        info!("Login to data providers started");

        let mut entries: HashMap<String, Entry> = HashMap::new();

        for provider in providers {
            let id = provider.id().to_string();

            provider.login().await.map_err(|source| StartupError::Login {
                provider: id.clone(),
                source,
            })?;
            debug!(provider = %id, "Logged in");

            let list = provider
                .register()
                .await
                .map_err(|source| StartupError::Register {
                    provider: id.clone(),
                    source,
                })?;
            debug!(provider = %id, queries = list.len(), "Registered queries");

            for (name, task) in list {
                let previous = entries.insert(
                    name.clone(),
                    Entry {
                        task,
                        provider: id.clone(),
                    },
                );
                if let Some(previous) = previous {
                    warn!(
                        query = %name,
                        replaced = %previous.provider,
                        by = %id,
                        "Query name registered twice, keeping the later provider's task"
                    );
                }
            }
        }

        info!(
            providers = providers.len(),
            queries = entries.len(),
            "Login to data providers took {:?}",
            started.elapsed()
        );

        Ok(Self { entries })
    }

    /// Build a registry directly from tasks (no providers involved).
    ///
    /// Later duplicates replace earlier ones, matching [`QueryRegistry::build`].
    pub fn from_tasks<I, S>(tasks: I) -> Self
    where
        I: IntoIterator<Item = (S, Arc<dyn QueryTask>)>,
        S: Into<String>,
    {
        let entries = tasks
            .into_iter()
            .map(|(name, task)| {
                (
                    name.into(),
                    Entry {
                        task,
                        provider: "inline".to_string(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn QueryTask>> {
        self.entries.get(name).map(|e| &e.task)
    }

    /// Id of the provider whose task is registered under `name`
    pub fn provider_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.provider.as_str())
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over every entry in unspecified order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Start a fan-out over every entry, stopping early once `cancel` fires.
    pub fn dispatch(&self, cancel: &CancellationToken) -> Dispatcher<'_> {
        Dispatcher::new(self.iter(), cancel.clone())
    }
}

impl std::fmt::Debug for QueryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRegistry")
            .field("queries", &self.names())
            .finish()
    }
}

/// Borrowing iterator over `(name, task)` pairs
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, String, Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Arc<dyn QueryTask>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, entry)| (name.as_str(), &entry.task))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
