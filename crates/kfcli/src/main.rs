//! kfcli - estimate musical key from pitch-class energy
//!
//! Subcommands:
//! - `kfcli estimate [VALUES...]` - rank all 24 keys for one distribution
//! - `kfcli batch <files...>` - estimate many files in parallel
//! - `kfcli config` - print the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kfconf::{KeyfinderConfig, OutputFormat, ReportConfig};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod render;

#[derive(Parser)]
#[command(name = "kfcli")]
#[command(about = "Estimate musical key from pitch-class energy")]
#[command(version)]
struct Cli {
    /// Config file (replaces ./keyfinder.toml)
    #[arg(long, global = true, env = "KEYFINDER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Decimal places for coefficients (0-17)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=17))]
    precision: Option<u8>,

    /// Spell tonics with flats (Db, Eb, Gb, Ab, Bb)
    #[arg(long)]
    flats: bool,

    /// Skip the 24-key correlation table
    #[arg(long)]
    no_table: bool,
}

impl OutputArgs {
    fn apply(&self, mut report: ReportConfig) -> ReportConfig {
        if self.json {
            report.format = OutputFormat::Json;
        }
        if let Some(precision) = self.precision {
            report.precision = usize::from(precision);
        }
        if self.flats {
            report.spelling = keyfinder::Spelling::Flats;
        }
        if self.no_table {
            report.show_table = false;
        }
        report
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rank all 24 keys for one pitch-class distribution
    Estimate {
        /// 12 energies from C to B, comma- or space-separated
        #[arg(allow_negative_numbers = true, conflicts_with = "input")]
        values: Vec<String>,

        /// JSON or text file with a distribution or chromagram ("-" for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Estimate each file in parallel, one summary per file
    Batch {
        /// Input files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the effective configuration and where it came from
    Config,
}

fn init_tracing(config: &KeyfinderConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.telemetry.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, sources) = KeyfinderConfig::load_with_sources_from(cli.config.as_deref())
        .context("loading configuration")?;

    init_tracing(&config);

    match cli.command {
        Commands::Estimate {
            values,
            input,
            output,
        } => {
            let opts = output.apply(config.report.clone());
            let source = match (&input, values.is_empty()) {
                (Some(path), _) => commands::Source::Path(path),
                (None, false) => commands::Source::Values(&values),
                (None, true) => commands::Source::Prompt,
            };
            commands::estimate(source, &opts)?;
        }
        Commands::Batch { files, output } => {
            let opts = output.apply(config.report.clone());
            commands::batch(&files, &opts)?;
        }
        Commands::Config => {
            commands::show_config(&config, &sources);
        }
    }

    Ok(())
}
