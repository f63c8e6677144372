//! Batch conversion: preset choice, background job, and progress relay

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use console::style;

use crate::pipeline::{
    build_menu, check_selection, job_for_label, plan_file, ConversionJob, JobSlot,
    PresetCatalog, ProgressRelay, RunnerOptions, Selection,
};
use crate::report::{export_batch_report, BatchSummary};
use crate::utils::{
    interrupt_flag, print_config, print_step_header, print_success, print_warning, BarIndicator,
};

use super::prompts::{confirm_conversion, select_preset};

/// Everything needed to run one batch from the command line
pub struct ConvertRequest<'a> {
    pub files: &'a [PathBuf],
    pub preset: Option<&'a str>,
    pub catalog: &'a PresetCatalog,
    pub runner: RunnerOptions,
    pub poll_interval: Duration,
    pub report: Option<&'a Path>,
    pub interactive: bool,
}

/// Resolve the job for `request`, prompting for the preset when needed.
///
/// Returns `Ok(None)` when the user backs out of the prompt.
pub fn resolve_job(request: &ConvertRequest) -> Result<Option<ConversionJob>> {
    let selection = Selection::from_paths(request.files.iter().cloned());

    if let Some(label) = request.preset {
        return Ok(Some(job_for_label(&selection, request.catalog, label)?));
    }

    if !request.interactive {
        anyhow::bail!("A preset is required when using --no-confirm. Use -p/--preset to specify.");
    }

    // surface why there is no menu instead of silently doing nothing
    check_selection(&selection, request.catalog)?;
    let menu = build_menu(&selection, request.catalog)
        .context("No conversion presets apply to the selected files")?;

    let Some(label) = select_preset(&menu)? else {
        return Ok(None);
    };
    Ok(menu.activate(&label).cloned())
}

/// Run a conversion batch and return its summary.
pub fn run_convert(request: &ConvertRequest) -> Result<Option<BatchSummary>> {
    let Some(job) = resolve_job(request)? else {
        println!("Cancelled by user.");
        return Ok(None);
    };

    let total = job.selection.len();
    let first = job
        .selection
        .files()
        .first()
        .map(|f| f.path.clone())
        .unwrap_or_default();

    print_config(
        &job.preset.label,
        &request.runner.tool,
        &first,
        total,
        request.runner.dry_run,
    );

    if request.interactive && !confirm_conversion(total, &job.preset.label)? {
        println!("Cancelled by user.");
        return Ok(None);
    }

    if request.runner.dry_run {
        print_dry_run(&job, &request.runner.tool);
    }

    print_step_header(1, "Converting");
    let step_start = Instant::now();
    let mut summary = BatchSummary::new(&job.preset.label, total);

    let interrupted = interrupt_flag();
    interrupted.store(false, Ordering::SeqCst);

    let slot = JobSlot::new();
    let mut running = slot.start(job, request.runner.clone())?;
    let mut relay = ProgressRelay::new(running.receiver(), BarIndicator::new(running.total()));
    relay.start();
    relay.run_until_end(request.poll_interval, || {
        if interrupted.swap(false, Ordering::SeqCst) && !running.control().is_cancelled() {
            tracing::warn!("interrupted, stopping the batch");
            running.cancel();
            summary.mark_cancelled();
        }
    });
    running.join();

    let (_, tally) = relay.into_parts();
    summary.record(tally);
    summary.set_elapsed(step_start.elapsed());

    if summary.cancelled {
        print_warning(&format!(
            "Stopped after {} of {} file(s)",
            summary.results.processed(),
            total
        ));
    } else if summary.failed_count() == 0 {
        print_success(&format!("Converted {} file(s)", summary.converted_count()));
    } else {
        print_warning(&format!(
            "{} of {} file(s) failed",
            summary.failed_count(),
            total
        ));
    }

    summary.display();

    if let Some(path) = request.report {
        export_batch_report(&summary, path, &request.runner.tool, request.runner.dry_run)?;
        print_success(&format!("Report written to {}", path.display()));
    }

    Ok(Some(summary))
}

fn print_dry_run(job: &ConversionJob, tool: &str) {
    println!(
        "\n {} Planned outputs",
        style("◆").cyan().bold()
    );
    for file in job.selection.files() {
        let Some(command) = plan_file(file, &job.preset, tool) else {
            continue;
        };
        println!(
            "   {} {} {}",
            style(&file.name).dim(),
            style("→").cyan(),
            command.output.display()
        );
    }
}
