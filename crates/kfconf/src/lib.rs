//! Configuration loading for the keyfinder CLI.
//!
//! The estimator itself has no tunables; everything here controls how
//! reports are rendered and how much the CLI logs.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/keyfinder/config.toml` (system)
//! 2. `~/.config/keyfinder/config.toml` (user)
//! 3. `./keyfinder.toml` (local override), or the path given with `--config`
//! 4. Environment variables (`KEYFINDER_*`)
//!
//! # Example Config
//!
//! ```toml
//! [report]
//! format = "text"
//! precision = 2
//! spelling = "sharps"
//! show_table = true
//!
//! [telemetry]
//! log_level = "warn"
//! ```

pub mod loader;
pub mod report;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use report::{OutputFormat, ReportConfig, TelemetryConfig};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KeyfinderConfig {
    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl KeyfinderConfig {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration with `config_path` replacing `./keyfinder.toml`.
    pub fn load_from(config_path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&std::path::Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = KeyfinderConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::apply_file(&mut config, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# keyfinder configuration\n\n");

        output.push_str("[report]\n");
        output.push_str(&format!("format = \"{}\"\n", self.report.format.as_str()));
        output.push_str(&format!("precision = {}\n", self.report.precision));
        output.push_str(&format!(
            "spelling = \"{}\"\n",
            report::spelling_str(self.report.spelling)
        ));
        output.push_str(&format!("show_table = {}\n", self.report.show_table));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = \"{}\"\n", self.telemetry.log_level));

        output
    }
}
