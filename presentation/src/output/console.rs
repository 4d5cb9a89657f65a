//! Result set rendering for console and HTTP output

use colored::Colorize;
use dashboard_application::BatchOutcome;
use dashboard_domain::{OutputFormat, ResultSet};

/// Formats merged results and batch summaries
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render `results` in the requested format
    pub fn render(results: &ResultSet, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Json => Self::format_json(results),
            OutputFormat::Text => Ok(Self::format_text(results)),
        }
    }

    /// Format as a JSON object, keys sorted
    pub fn format_json(results: &ResultSet) -> Result<String, serde_json::Error> {
        serde_json::to_string(results)
    }

    /// Format as an indented JSON object (terminal output)
    pub fn format_json_pretty(results: &ResultSet) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(results)
    }

    /// Debug dump: `ResultSet { key: value, ... }`, one entry per line
    pub fn format_text(results: &ResultSet) -> String {
        if results.is_empty() {
            return "ResultSet {}\n".to_string();
        }

        let mut output = String::from("ResultSet {\n");
        for (key, value) in results.iter() {
            output.push_str(&format!("    {}: {},\n", key, value));
        }
        output.push_str("}\n");
        output
    }

    /// One-line colored summary of a batch, for stderr
    pub fn format_summary(outcome: &BatchOutcome) -> String {
        let mut output = format!(
            "{} {} keys from {} queries in {:?}",
            "Collected".cyan().bold(),
            outcome.results.len(),
            outcome.succeeded.len() + outcome.failed.len(),
            outcome.elapsed
        );

        if outcome.cancelled {
            output.push_str(&format!(" {}", "(cancelled, partial)".yellow()));
        }

        for (name, error) in &outcome.failed {
            output.push_str(&format!("\n  {} {}: {}", "x".red(), name.bold(), error));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn hydra() -> ResultSet {
        ResultSet::new().with("Name", "Hydra").with("Heads", 8)
    }

    #[test]
    fn test_format_text_sorted_and_quoted() {
        assert_eq!(
            ConsoleFormatter::format_text(&hydra()),
            "ResultSet {\n    Heads: 8,\n    Name: \"Hydra\",\n}\n"
        );
    }

    #[test]
    fn test_format_text_empty() {
        assert_eq!(ConsoleFormatter::format_text(&ResultSet::new()), "ResultSet {}\n");
    }

    #[test]
    fn test_render_json() {
        let json = ConsoleFormatter::render(&hydra(), OutputFormat::Json).unwrap();
        assert_eq!(json, r#"{"Heads":8,"Name":"Hydra"}"#);
    }

    #[test]
    fn test_format_json_pretty_parses_back() {
        let json = ConsoleFormatter::format_json_pretty(&hydra()).unwrap();
        let back: ResultSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hydra());
    }

    #[test]
    fn test_format_summary_lists_failures() {
        colored::control::set_override(false);
        let outcome = BatchOutcome {
            results: hydra(),
            succeeded: vec!["Name".into(), "Heads".into()],
            failed: vec![("simpleQuery".into(), "no rows".into())],
            cancelled: true,
            elapsed: Duration::from_millis(5),
        };

        let summary = ConsoleFormatter::format_summary(&outcome);

        assert!(summary.starts_with("Collected 2 keys from 3 queries"));
        assert!(summary.contains("(cancelled, partial)"));
        assert!(summary.contains("simpleQuery: no rows"));
    }
}
