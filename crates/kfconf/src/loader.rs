//! Config file discovery, loading, and environment variable overlay.

use crate::report::{parse_spelling, OutputFormat};
use crate::{ConfigError, KeyfinderConfig};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided it replaces the local override, and is returned
/// even when missing so that loading reports the bad path.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    // System config
    let system = PathBuf::from("/etc/keyfinder/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("keyfinder/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    // CLI override takes precedence over local
    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    // Local override (current directory)
    let local = PathBuf::from("keyfinder.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Load config from a TOML file on top of compiled defaults.
pub fn load_from_file(path: &Path) -> Result<KeyfinderConfig, ConfigError> {
    let mut config = KeyfinderConfig::default();
    apply_file(&mut config, path)?;
    Ok(config)
}

/// Overlay the keys present in a TOML file onto `config`.
pub fn apply_file(config: &mut KeyfinderConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    apply_toml(config, &contents, path)
}

/// Overlay the keys present in TOML text onto `config`.
///
/// Keys absent from the text keep their current value, so files layer.
pub fn apply_toml(
    config: &mut KeyfinderConfig,
    contents: &str,
    path: &Path,
) -> Result<(), ConfigError> {
    let parse_err = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let table: toml::Table = contents
        .parse()
        .map_err(|e: toml::de::Error| parse_err(e.to_string()))?;

    if let Some(report) = table.get("report").and_then(|v| v.as_table()) {
        if let Some(v) = report.get("format") {
            let s = v
                .as_str()
                .ok_or_else(|| parse_err("report.format must be a string".to_string()))?;
            config.report.format = OutputFormat::parse(s)
                .ok_or_else(|| parse_err(format!("unknown report.format {:?}", s)))?;
        }
        if let Some(v) = report.get("precision") {
            let n = v
                .as_integer()
                .filter(|n| (0..=17).contains(n))
                .ok_or_else(|| parse_err("report.precision must be an integer 0-17".to_string()))?;
            config.report.precision = n as usize;
        }
        if let Some(v) = report.get("spelling") {
            let s = v
                .as_str()
                .ok_or_else(|| parse_err("report.spelling must be a string".to_string()))?;
            config.report.spelling = parse_spelling(s)
                .ok_or_else(|| parse_err(format!("unknown report.spelling {:?}", s)))?;
        }
        if let Some(v) = report.get("show_table") {
            config.report.show_table = v
                .as_bool()
                .ok_or_else(|| parse_err("report.show_table must be a boolean".to_string()))?;
        }
    }

    if let Some(telemetry) = table.get("telemetry").and_then(|v| v.as_table()) {
        if let Some(v) = telemetry.get("log_level") {
            let s = v
                .as_str()
                .ok_or_else(|| parse_err("telemetry.log_level must be a string".to_string()))?;
            config.telemetry.log_level = s.to_string();
        }
    }

    Ok(())
}

/// Apply environment variable overrides to config.
///
/// Unparseable values are skipped with a warning rather than failing startup.
pub fn apply_env_overrides(config: &mut KeyfinderConfig, sources: &mut ConfigSources) {
    apply_overrides(config, sources, |key| env::var(key).ok());
}

fn apply_overrides(
    config: &mut KeyfinderConfig,
    sources: &mut ConfigSources,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("KEYFINDER_FORMAT") {
        match OutputFormat::parse(&v) {
            Some(format) => {
                config.report.format = format;
                sources.env_overrides.push("KEYFINDER_FORMAT".to_string());
            }
            None => warn!(value = %v, "ignoring unknown KEYFINDER_FORMAT"),
        }
    }
    if let Some(v) = lookup("KEYFINDER_PRECISION") {
        match v.trim().parse::<usize>() {
            Ok(precision) if precision <= 17 => {
                config.report.precision = precision;
                sources.env_overrides.push("KEYFINDER_PRECISION".to_string());
            }
            _ => warn!(value = %v, "ignoring invalid KEYFINDER_PRECISION"),
        }
    }
    if let Some(v) = lookup("KEYFINDER_SPELLING") {
        match parse_spelling(&v) {
            Some(spelling) => {
                config.report.spelling = spelling;
                sources.env_overrides.push("KEYFINDER_SPELLING".to_string());
            }
            None => warn!(value = %v, "ignoring unknown KEYFINDER_SPELLING"),
        }
    }
    if let Some(v) = lookup("KEYFINDER_SHOW_TABLE") {
        match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => {
                config.report.show_table = true;
                sources.env_overrides.push("KEYFINDER_SHOW_TABLE".to_string());
            }
            "0" | "false" | "no" => {
                config.report.show_table = false;
                sources.env_overrides.push("KEYFINDER_SHOW_TABLE".to_string());
            }
            _ => warn!(value = %v, "ignoring invalid KEYFINDER_SHOW_TABLE"),
        }
    }
    if let Some(v) = lookup("KEYFINDER_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("KEYFINDER_LOG_LEVEL".to_string());
    }
}
