//! Query results subdomain.
//!
//! - [`value::ResultValue`]: the small closed set of value kinds a query
//!   task can produce
//! - [`result_set::ResultSet`]: string-keyed mapping of those values;
//!   produced per task and merged per batch

pub mod result_set;
pub mod value;
