//! Presentation layer for dashboard
//!
//! This crate contains CLI definitions, the HTTP surface, output
//! formatters and progress reporters.

pub mod cli;
pub mod http;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use http::{AppState, DashboardServer, ServerError, router};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
