//! Application layer for dashboard
//!
//! This crate contains the query registry, the fan-out/fan-in use case,
//! port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::RequestConfig;
pub use ports::{
    progress::{NoProgress, ProgressNotifier},
    provider::{Provider, ProviderError, QueryList},
    query_task::{FnQuery, QueryError, QueryTask, fn_query},
};
pub use registry::{QueryRegistry, StartupError};
pub use use_cases::run_queries::{
    BatchOutcome, Collector, Dispatcher, RequestScope, RunQueriesError, RunQueriesUseCase,
    TaskOutcome, execute_task,
};
