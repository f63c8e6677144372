//! soxconv: batch audio conversion with sox presets
//!
//! A command-line front end that offers the presets applicable to a set of
//! audio files, runs sox on each file in a background worker, and reports
//! progress while it goes.

mod cli;
mod pipeline;
mod report;
mod utils;

use anyhow::Result;
use clap::Parser;

use cli::{run_convert, run_menu, run_presets, Cli, Commands, ConvertRequest};
use utils::{init_logging, print_banner, print_completion};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = cli.load_catalog()?;

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Menu { files } => run_menu(files, &catalog),
            Commands::Presets { json } => run_presets(&catalog, *json),
        };
    }

    if cli.files.is_empty() {
        anyhow::bail!("No input files given. Pass one or more .wav, .pcm or .raw files.");
    }

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    let request = ConvertRequest {
        files: &cli.files,
        preset: cli.preset.as_deref(),
        catalog: &catalog,
        runner: cli.runner_options(),
        poll_interval: cli.poll_interval(),
        report: cli.report.as_deref(),
        interactive: !cli.no_confirm,
    };

    let Some(summary) = run_convert(&request)? else {
        return Ok(());
    };

    if summary.cancelled {
        anyhow::bail!(
            "Conversion interrupted after {} of {} file(s)",
            summary.results.processed(),
            summary.total_files
        );
    }

    if summary.failed_count() > 0 {
        anyhow::bail!(
            "{} of {} file(s) failed to convert",
            summary.failed_count(),
            summary.total_files
        );
    }

    // Final completion message
    print_completion();

    Ok(())
}
