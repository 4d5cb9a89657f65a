//! Date range subdomain
//!
//! A [`DateRange`](value_objects::DateRange) scopes every query task of one
//! request. It is parsed once from the inbound payload and then shared
//! read-only across all concurrently running tasks.
//!
//! - [`format::DateFormat`]: how instants are encoded on the wire
//! - [`parsing::parse_date_range`]: payload → `DateRange`

pub mod format;
pub mod parsing;
pub mod value_objects;
