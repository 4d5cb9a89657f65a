//! CLI command definitions

use clap::{Parser, ValueEnum};
use dashboard_domain::DateFormat;
use std::path::PathBuf;

/// Output format for one-shot results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `ResultSet { key: value }` dump
    Text,
    /// JSON object
    Json,
}

impl From<OutputFormat> for dashboard_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => dashboard_domain::OutputFormat::Text,
            OutputFormat::Json => dashboard_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for dashboard
#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(author, version, about = "Dashboard backend - runs every registered query over a date range")]
#[command(long_about = r#"
Dashboard runs every registered query concurrently over one date range and
merges their results into a single key/value set.

Without --begin/--end it starts an HTTP server:
  POST /search     JSON body {"begin": ..., "end": ...}
  GET  /health     registered query names
  GET  /*          static files from the configured directory

Configuration files are loaded from (in priority order):
1. --config <path>        Explicit config file
2. ./dashboard.toml       Project-level config
3. ~/.config/dashboard/config.toml   Global config

Example:
  dashboard --bind 127.0.0.1:8080
  dashboard --begin 20240101 --end 20240131 -o json
  dashboard --date-format epoch --begin 1704067200 --end 1706659200
"#)]
pub struct Cli {
    /// Start of the range for a one-shot run (requires --end)
    #[arg(long, value_name = "DATE", requires = "end")]
    pub begin: Option<String>,

    /// End of the range for a one-shot run (requires --begin)
    #[arg(long, value_name = "DATE", requires = "begin")]
    pub end: Option<String>,

    /// Output format for one-shot runs
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Encoding of begin/end: calendar (YYYYMMDD) or epoch (seconds)
    #[arg(long, value_name = "FORMAT")]
    pub date_format: Option<DateFormat>,

    /// Cancel a request that has not completed after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Address the HTTP server listens on
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Directory served for paths other than /search and /health
    #[arg(long, value_name = "PATH")]
    pub static_dir: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// The `(begin, end)` pair when running in one-shot mode
    pub fn one_shot_range(&self) -> Option<(&str, &str)> {
        match (&self.begin, &self.end) {
            (Some(begin), Some(end)) => Some((begin, end)),
            _ => None,
        }
    }
}
