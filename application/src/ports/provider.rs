//! Provider port
//!
//! A provider is an external data source that contributes one or more named
//! query tasks after a login step. Providers are consulted exactly once, at
//! startup, by [`QueryRegistry::build`](crate::registry::QueryRegistry::build).

use crate::ports::query_task::QueryTask;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Name → task mapping contributed by one provider
pub type QueryList = HashMap<String, Arc<dyn QueryTask>>;

/// Errors that can occur while bringing a provider up
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    #[error("Provider not logged in")]
    NotLoggedIn,
}

/// Source of named query tasks
#[async_trait]
pub trait Provider: Send + Sync {
    /// Unique identifier, used in logs and collision diagnostics
    fn id(&self) -> &str;

    /// Authenticate / connect. Called before [`Provider::register`].
    async fn login(&self) -> Result<(), ProviderError>;

    /// Return every task this provider contributes
    async fn register(&self) -> Result<QueryList, ProviderError>;
}
