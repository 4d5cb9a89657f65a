//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request payload could not be turned into a date range
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl DomainError {
    /// Shorthand for building a [`DomainError::MalformedInput`]
    pub fn malformed(message: impl Into<String>) -> Self {
        DomainError::MalformedInput(message.into())
    }

    /// Check if this error represents unusable client input
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, DomainError::MalformedInput(_))
    }
}
