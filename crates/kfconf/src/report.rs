//! Output settings for key reports.

use keyfinder::Spelling;
use serde::{Deserialize, Serialize};

/// How a key report is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Correlation table plus "Most likely" / "Also possible" lines.
    #[default]
    Text,
    /// One JSON document per report.
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

pub(crate) fn parse_spelling(value: &str) -> Option<Spelling> {
    match value.trim().to_ascii_lowercase().as_str() {
        "sharps" => Some(Spelling::Sharps),
        "flats" => Some(Spelling::Flats),
        _ => None,
    }
}

pub(crate) fn spelling_str(spelling: Spelling) -> &'static str {
    match spelling {
        Spelling::Sharps => "sharps",
        Spelling::Flats => "flats",
    }
}

/// Report rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default: text
    #[serde(default)]
    pub format: OutputFormat,

    /// Decimal places for coefficients in the text table.
    /// Default: 2
    #[serde(default = "ReportConfig::default_precision")]
    pub precision: usize,

    /// Tonic spelling. Default: sharps
    #[serde(default)]
    pub spelling: Spelling,

    /// Print the 24-key correlation table before the summary.
    /// Default: true
    #[serde(default = "ReportConfig::default_show_table")]
    pub show_table: bool,
}

impl ReportConfig {
    fn default_precision() -> usize {
        2
    }

    fn default_show_table() -> bool {
        true
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            precision: Self::default_precision(),
            spelling: Spelling::default(),
            show_table: Self::default_show_table(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    /// Default: warn
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "warn".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}
