//! JSON export of batch results

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use super::summary::BatchSummary;
use crate::pipeline::FileOutcome;

/// Metadata about the conversion run
#[derive(Serialize)]
pub struct BatchMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// soxconv version
    pub soxconv_version: String,
    /// Converter executable
    pub tool: String,
    /// Preset label
    pub preset: String,
    pub dry_run: bool,
    pub cancelled: bool,
}

/// Per-file result
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileResult {
    Converted { file: String, output: String },
    Failed { file: String, reason: String },
}

/// Counts for the whole batch
#[derive(Serialize)]
pub struct BatchCounts {
    pub selected: usize,
    pub converted: usize,
    pub failed: usize,
    pub skipped: usize,
    pub elapsed_secs: f64,
}

/// Complete batch export with metadata
#[derive(Serialize)]
pub struct BatchExport {
    pub metadata: BatchMetadata,
    pub summary: BatchCounts,
    pub files: Vec<FileResult>,
}

impl BatchExport {
    pub fn new(summary: &BatchSummary, tool: &str, dry_run: bool) -> Self {
        let files = summary
            .results
            .outcomes
            .iter()
            .map(|outcome| match outcome {
                FileOutcome::Converted { name, output } => FileResult::Converted {
                    file: name.clone(),
                    output: output.display().to_string(),
                },
                FileOutcome::Failed { name, reason } => FileResult::Failed {
                    file: name.clone(),
                    reason: reason.clone(),
                },
            })
            .collect();

        Self {
            metadata: BatchMetadata {
                timestamp: Utc::now().to_rfc3339(),
                soxconv_version: env!("CARGO_PKG_VERSION").to_string(),
                tool: tool.to_string(),
                preset: summary.preset.clone(),
                dry_run,
                cancelled: summary.cancelled,
            },
            summary: BatchCounts {
                selected: summary.total_files,
                converted: summary.converted_count(),
                failed: summary.failed_count(),
                skipped: summary.skipped(),
                elapsed_secs: summary.elapsed.as_secs_f64(),
            },
            files,
        }
    }
}

/// Export batch results to a JSON file
///
/// # Arguments
/// * `summary` - Results collected while relaying progress
/// * `output_path` - Path to write the JSON file
/// * `tool` - Converter executable used for the batch
/// * `dry_run` - Whether the batch only printed commands
pub fn export_batch_report(
    summary: &BatchSummary,
    output_path: &Path,
    tool: &str,
    dry_run: bool,
) -> Result<()> {
    let export = BatchExport::new(summary, tool, dry_run);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize batch report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write batch report to {}", output_path.display()))?;

    Ok(())
}
