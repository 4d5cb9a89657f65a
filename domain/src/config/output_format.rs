//! Output format value object

use serde::{Deserialize, Serialize};

/// Rendering of a merged result set
///
/// This is a domain concept representing how the batch output should be
/// handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Machine-readable JSON object
    Json,
    /// Human-readable debug dump (default)
    #[default]
    Text,
}

impl OutputFormat {
    /// Pick the format requested through an HTTP `Accept` header.
    ///
    /// Only an exact `application/json` media type selects JSON; anything
    /// else (including a missing header) falls back to the text dump.
    pub fn from_accept(accept: Option<&str>) -> Self {
        match accept {
            Some(value)
                if value
                    .split(';')
                    .next()
                    .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json")) =>
            {
                OutputFormat::Json
            }
            _ => OutputFormat::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}
