use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use keyfinder::{KeyEstimator, KeyReport, PitchClassVector};
use kfconf::{ConfigSources, KeyfinderConfig, OutputFormat, ReportConfig};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::{input, render};

/// Where a single estimate reads its distribution from.
pub enum Source<'a> {
    Values(&'a [String]),
    Path(&'a Path),
    Prompt,
}

fn analyze(pcv: &PitchClassVector) -> Result<KeyReport> {
    let board = KeyEstimator::new().score(pcv)?;
    Ok(board.report())
}

pub fn estimate(source: Source<'_>, opts: &ReportConfig) -> Result<()> {
    let pcv = match source {
        Source::Values(values) => input::from_args(values)?,
        Source::Path(path) => input::from_path(path)?,
        Source::Prompt => input::from_prompt()?,
    };

    let report = analyze(&pcv).context("estimating key")?;
    info!(best = %report.best, alternate = %report.alternate, "estimated key");

    match opts.format {
        OutputFormat::Text => print!("{}", render::text(&report, opts)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct BatchEntry {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<KeyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Estimate every file independently and in parallel.
///
/// Output keeps the order of `paths`. Fails after printing if any file failed.
pub fn batch(paths: &[PathBuf], opts: &ReportConfig) -> Result<()> {
    let entries: Vec<BatchEntry> = paths
        .par_iter()
        .map(|path| {
            let result = input::from_path(path).and_then(|pcv| analyze(&pcv));
            match result {
                Ok(report) => {
                    info!(path = %path.display(), best = %report.best, "estimated key");
                    BatchEntry {
                        path: path.clone(),
                        report: Some(report),
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "estimation failed");
                    BatchEntry {
                        path: path.clone(),
                        report: None,
                        error: Some(format!("{:#}", e)),
                    }
                }
            }
        })
        .collect();

    match opts.format {
        OutputFormat::Text => {
            for entry in &entries {
                let source = entry.path.display().to_string();
                match (&entry.report, &entry.error) {
                    (Some(report), _) => println!("{}", render::summary_line(&source, report, opts)),
                    (None, Some(error)) => eprintln!("{}: error: {}", source, error),
                    (None, None) => {}
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }

    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    if failed > 0 {
        bail!("{} of {} inputs failed", failed, entries.len());
    }
    Ok(())
}

pub fn show_config(config: &KeyfinderConfig, sources: &ConfigSources) {
    print!("{}", config.to_toml());

    println!();
    if sources.files.is_empty() {
        println!("# sources: defaults only");
    } else {
        for file in &sources.files {
            println!("# loaded: {}", file.display());
        }
    }
    for var in &sources.env_overrides {
        println!("# env: {}", var);
    }
}
