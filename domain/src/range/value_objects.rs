//! Date range value object

use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Begin/end instant pair for one request (Value Object)
///
/// Immutable once built. Construction rejects inverted ranges, so
/// `begin <= end` always holds; an empty range (`begin == end`) is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct DateRange {
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Create a new date range
    pub fn new(begin: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DomainError> {
        if begin > end {
            return Err(DomainError::malformed(format!(
                "begin ({}) is after end ({})",
                begin.format("%Y-%m-%d %H:%M:%S"),
                end.format("%Y-%m-%d %H:%M:%S")
            )));
        }
        Ok(Self { begin, end })
    }

    pub fn begin(&self) -> DateTime<Utc> {
        self.begin
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

}

/// Unchecked wire form; deserialization goes through [`DateRange::new`].
#[derive(Deserialize)]
struct RangeBounds {
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RangeBounds> for DateRange {
    type Error = DomainError;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        DateRange::new(bounds.begin, bounds.end)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            self.begin.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
