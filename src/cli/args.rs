//! Command-line argument definitions using clap

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::pipeline::{PresetCatalog, RunnerOptions, DEFAULT_TOOL};

/// soxconv - Convert audio files with sox using sample-rate/channel/bit-depth presets
#[derive(Parser, Debug)]
#[command(name = "soxconv")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Audio files to convert (wav, pcm or raw)
    pub files: Vec<PathBuf>,

    /// Preset label, e.g. r16000c1i16.
    /// If not provided, will be selected interactively from the applicable presets.
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Converter executable
    #[arg(long, default_value = DEFAULT_TOOL)]
    pub tool: String,

    /// Print the converter commands instead of running them
    #[arg(long, default_value = "false")]
    pub dry_run: bool,

    /// Milliseconds between two progress updates
    #[arg(long, default_value = "100", value_parser = validate_poll_interval)]
    pub poll_interval_ms: u64,

    /// Write a JSON report of the batch to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip interactive prompts (requires --preset)
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// JSON preset catalog replacing the built-in presets
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the presets offered for a selection of files
    Menu {
        /// Audio files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List the preset catalog
    Presets {
        /// Print the catalog as JSON (usable with --catalog)
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

impl Cli {
    /// Runner settings derived from the command line.
    pub fn runner_options(&self) -> RunnerOptions {
        RunnerOptions {
            tool: self.tool.clone(),
            dry_run: self.dry_run,
            ..Default::default()
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// The catalog from --catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<PresetCatalog> {
        match &self.catalog {
            Some(path) => PresetCatalog::load(path)
                .with_context(|| format!("Failed to load preset catalog: {}", path.display())),
            None => Ok(PresetCatalog::builtin()),
        }
    }
}

/// Validator for poll_interval_ms parameter
fn validate_poll_interval(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of milliseconds", s))?;

    if !(1..=10_000).contains(&value) {
        Err(format!(
            "poll_interval_ms must be between 1 and 10000, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
