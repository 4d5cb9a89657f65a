//! Application-level configuration.
//!
//! - [`RequestConfig`]: how inbound requests are decoded and bounded

pub mod request_config;

pub use request_config::RequestConfig;
