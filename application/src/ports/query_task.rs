//! Query task port
//!
//! Defines the single capability every named query exposes: compute a
//! partial [`ResultSet`] for a [`DateRange`], observing the request's
//! cancellation token at its own suspension points.

use async_trait::async_trait;
use dashboard_domain::{DateRange, ResultSet};
use std::future::Future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors a query task can report
///
/// These never escalate past the task boundary: the dispatcher logs them
/// with the task's name and carries on with the rest of the batch.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Query returned no rows")]
    NoRows,

    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("Query cancelled")]
    Cancelled,

    #[error("Other error: {0}")]
    Other(String),
}

impl QueryError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, QueryError::Cancelled)
    }
}

/// A named unit of work stored in the query registry
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait QueryTask: Send + Sync {
    /// Compute this task's contribution for `range`.
    ///
    /// Implementations should return [`QueryError::Cancelled`] (or whatever
    /// they have) once `cancel` fires; cancellation is cooperative.
    async fn execute(
        &self,
        cancel: &CancellationToken,
        range: &DateRange,
    ) -> Result<ResultSet, QueryError>;
}

/// Closure-backed [`QueryTask`]
pub struct FnQuery<F> {
    f: F,
}

/// Wrap an async closure as a [`QueryTask`].
///
/// ```ignore
/// let task = fn_query(|_cancel, _range| async { Ok(ResultSet::single("Heads", 8)) });
/// ```
pub fn fn_query<F, Fut>(f: F) -> FnQuery<F>
where
    F: Fn(CancellationToken, DateRange) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ResultSet, QueryError>> + Send,
{
    FnQuery { f }
}

#[async_trait]
impl<F, Fut> QueryTask for FnQuery<F>
where
    F: Fn(CancellationToken, DateRange) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ResultSet, QueryError>> + Send,
{
    async fn execute(
        &self,
        cancel: &CancellationToken,
        range: &DateRange,
    ) -> Result<ResultSet, QueryError> {
        (self.f)(cancel.clone(), *range).await
    }
}
