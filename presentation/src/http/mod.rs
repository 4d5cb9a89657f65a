//! HTTP surface
//!
//! `POST /search` runs one batch per request; everything else is static
//! content or informational.

pub mod handlers;
pub mod server;

pub use server::{AppState, DashboardServer, ServerError, router};
