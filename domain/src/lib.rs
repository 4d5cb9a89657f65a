//! Domain layer for dashboard
//!
//! This crate contains the value objects shared by every layer.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **DateRange**: the begin/end instant pair scoping one request
//! - **ResultValue**: a single computed value (string, integer, float, boolean)
//! - **ResultSet**: a string-keyed mapping of values produced by a query task,
//!   or by merging the output of every task in a batch

pub mod config;
pub mod core;
pub mod query;
pub mod range;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::error::DomainError;
pub use query::{result_set::ResultSet, value::ResultValue};
pub use range::{
    format::DateFormat,
    parsing::{parse_date_range, parse_range_args},
    value_objects::DateRange,
};
