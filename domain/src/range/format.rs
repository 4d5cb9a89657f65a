//! Wire encoding of the two instants in a date range payload

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How `begin`/`end` are encoded in an inbound request.
///
/// Chosen once per deployment; a server never accepts both at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `"YYYYMMDD"` strings, interpreted as midnight UTC (default)
    #[default]
    Calendar,
    /// Integer seconds since the Unix epoch
    Epoch,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::Calendar => "calendar",
            DateFormat::Epoch => "epoch",
        }
    }
}

impl std::fmt::Display for DateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "calendar" | "date" => Ok(DateFormat::Calendar),
            "epoch" | "unix" => Ok(DateFormat::Epoch),
            other => Err(format!(
                "unknown date format '{}' (expected 'calendar' or 'epoch')",
                other
            )),
        }
    }
}
