//! Date range extraction from a raw request payload
//!
//! The payload is a JSON object with two fields, `begin` and `end`
//! (`Begin`/`End` are accepted too). Their encoding depends on the
//! deployment's [`DateFormat`]. Every failure maps to
//! [`DomainError::MalformedInput`].

use super::format::DateFormat;
use super::value_objects::DateRange;
use crate::core::error::DomainError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;

const CALENDAR_PATTERN: &str = "%Y%m%d";

#[derive(Debug, Deserialize)]
struct RawRange<T> {
    #[serde(alias = "Begin")]
    begin: T,
    #[serde(alias = "End")]
    end: T,
}

/// Parse a raw request body into a [`DateRange`].
pub fn parse_date_range(payload: &[u8], format: DateFormat) -> Result<DateRange, DomainError> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Err(DomainError::malformed("empty request body"));
    }

    let (begin, end) = match format {
        DateFormat::Calendar => {
            let raw: RawRange<String> = decode(payload)?;
            (
                parse_calendar(&raw.begin).map_err(|e| field_error("begin", e))?,
                parse_calendar(&raw.end).map_err(|e| field_error("end", e))?,
            )
        }
        DateFormat::Epoch => {
            let raw: RawRange<i64> = decode(payload)?;
            (
                parse_epoch(raw.begin).map_err(|e| field_error("begin", e))?,
                parse_epoch(raw.end).map_err(|e| field_error("end", e))?,
            )
        }
    };

    DateRange::new(begin, end)
}

/// Parse a range given as two separate strings (command-line arguments).
///
/// Epoch values are decimal integers; calendar values use `YYYYMMDD`.
pub fn parse_range_args(
    begin: &str,
    end: &str,
    format: DateFormat,
) -> Result<DateRange, DomainError> {
    let parse = |value: &str| match format {
        DateFormat::Calendar => parse_calendar(value.trim()),
        DateFormat::Epoch => value
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("'{}': {}", value, e))
            .and_then(parse_epoch),
    };

    let begin = parse(begin).map_err(|e| field_error("begin", e))?;
    let end = parse(end).map_err(|e| field_error("end", e))?;
    DateRange::new(begin, end)
}

fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<RawRange<T>, DomainError> {
    serde_json::from_slice(payload)
        .map_err(|e| DomainError::malformed(format!("cannot decode date range: {}", e)))
}

fn field_error(field: &str, reason: String) -> DomainError {
    DomainError::malformed(format!("error parsing {} time: {}", field, reason))
}

/// `YYYYMMDD` → midnight UTC of that day
fn parse_calendar(value: &str) -> Result<DateTime<Utc>, String> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not an 8-digit YYYYMMDD date", value));
    }
    let date = NaiveDate::parse_from_str(value, CALENDAR_PATTERN)
        .map_err(|e| format!("'{}': {}", value, e))?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{}' has no midnight", value))
}

fn parse_epoch(seconds: i64) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| format!("{} is outside the representable range", seconds))
}
