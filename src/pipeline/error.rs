//! Error types for preset selection, catalog loading and conversion jobs.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the conversion pipeline.
///
/// Per-file conversion failures inside a running batch are never returned
/// through this type; they are reported as [`ProgressMessage::Failed`]
/// so the rest of the batch keeps going.
///
/// [`ProgressMessage::Failed`]: crate::pipeline::ProgressMessage::Failed
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A selected file has no extension, or one outside the accepted set.
    #[error("Unrecognized audio extension for {}: expected one of raw, pcm, wav", path.display())]
    UnrecognizedExtension { path: PathBuf },

    /// The selection is valid on its own but no preset accepts all of its formats.
    #[error("No preset accepts the selected formats: {}", extensions.join(", "))]
    NoApplicablePreset { extensions: Vec<String> },

    /// The selection contains no files.
    #[error("No files selected")]
    EmptySelection,

    /// The requested preset label is not in the catalog.
    #[error("Unknown preset '{label}'")]
    UnknownPreset { label: String },

    /// A preset exists but cannot convert the selection.
    #[error("Preset '{label}' does not accept the selected formats: {}", extensions.join(", "))]
    PresetNotApplicable { label: String, extensions: Vec<String> },

    /// A job is still running in this slot.
    #[error("A conversion job is already running")]
    JobAlreadyRunning,

    /// The converter executable could not be started.
    #[error("Failed to launch '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter ran but exited unsuccessfully.
    ///
    /// `stderr` holds the tail of the converter's diagnostics, possibly empty.
    #[error(
        "'{tool}' exited with {}{}",
        code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")),
        if stderr.is_empty() { String::new() } else { format!(": {stderr}") }
    )]
    ConverterExit {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A preset catalog file is malformed.
    #[error("Invalid preset catalog: {0}")]
    Catalog(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
