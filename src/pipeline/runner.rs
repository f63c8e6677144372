//! Sequential conversion of a job's files with the external converter

use std::io::Read;
use std::process::{Child, ChildStderr, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;

use super::command::{ConverterCommand, OptionSet, DEFAULT_TOOL};
use super::error::ConvertError;
use super::job::{ConversionJob, JobControl, ProgressMessage};
use super::paths::{derive_output_path, find_available_path};
use super::presets::Preset;
use super::selection::SelectedFile;

/// How converter processes are launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Converter executable, `sox` by default
    pub tool: String,
    /// Log the commands instead of running them
    pub dry_run: bool,
    /// How often a running converter is checked for exit or cancellation
    pub wait_interval: Duration,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            dry_run: false,
            wait_interval: Duration::from_millis(20),
        }
    }
}

/// Converter stderr lines kept for a failure reason
const STDERR_TAIL_LINES: usize = 3;

enum Outcome {
    Completed,
    Cancelled,
}

/// Build the converter invocation for one file.
///
/// Returns `None` when the file has no extension.
pub fn plan_file(file: &SelectedFile, preset: &Preset, tool: &str) -> Option<ConverterCommand> {
    let extension = file.extension.as_deref()?;
    let candidate = derive_output_path(&file.path, &preset.suffix, preset.output.extension());
    let output = find_available_path(&candidate);
    let options = OptionSet::for_input(preset, extension);
    Some(ConverterCommand::new(tool, options, &file.path, &output))
}

/// Convert every file of `job` in order, reporting on `sender`.
///
/// Sends one `Done` or `Failed` per converted file and a final `End`.
/// Files without an extension are skipped without a message. Once
/// `control` is cancelled the running converter is killed, nothing more is
/// reported for it or later files, and `End` is sent.
pub fn run(
    job: &ConversionJob,
    options: &RunnerOptions,
    sender: &Sender<ProgressMessage>,
    control: &JobControl,
) {
    for file in job.selection.files() {
        if control.is_cancelled() {
            break;
        }

        let Some(command) = plan_file(file, &job.preset, &options.tool) else {
            tracing::debug!(file = %file.path.display(), "skipping file without extension");
            continue;
        };

        let message = match execute(&command, options, control) {
            Ok(Outcome::Completed) => ProgressMessage::Done {
                name: file.name.clone(),
                output: command.output.clone(),
            },
            Ok(Outcome::Cancelled) => {
                tracing::info!(file = %file.name, "conversion cancelled");
                break;
            }
            Err(err) => {
                tracing::warn!(file = %file.name, error = %err, "conversion failed");
                ProgressMessage::Failed {
                    name: file.name.clone(),
                    reason: err.to_string(),
                }
            }
        };

        send(sender, message);
    }

    send(sender, ProgressMessage::End);
}

fn send(sender: &Sender<ProgressMessage>, message: ProgressMessage) {
    if sender.send(message).is_err() {
        tracing::debug!("progress receiver dropped");
    }
}

fn execute(
    command: &ConverterCommand,
    options: &RunnerOptions,
    control: &JobControl,
) -> Result<Outcome, ConvertError> {
    if options.dry_run {
        tracing::info!(command = %command, "dry run");
        return Ok(Outcome::Completed);
    }

    tracing::debug!(command = %command, "launching converter");
    let mut child = command
        .to_command()
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ConvertError::Spawn {
            tool: command.tool.clone(),
            source,
        })?;

    // keep sox diagnostics off the terminal while the progress bar is drawn
    let stderr = child.stderr.take().map(drain_stderr);

    let pid = child.id();
    control.in_flight().insert(pid);
    let waited = wait_or_cancel(&mut child, control, options.wait_interval);
    control.in_flight().remove(pid);

    match waited? {
        Some(status) => {
            let diagnostics = stderr.map(collect_stderr).unwrap_or_default();
            if status.success() {
                if !diagnostics.is_empty() {
                    tracing::debug!(command = %command, stderr = %diagnostics, "converter output");
                }
                Ok(Outcome::Completed)
            } else {
                Err(ConvertError::ConverterExit {
                    tool: command.tool.clone(),
                    code: status.code(),
                    stderr: diagnostics,
                })
            }
        }
        None => Ok(Outcome::Cancelled),
    }
}

fn drain_stderr(mut pipe: ChildStderr) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(err) = pipe.read_to_end(&mut buf) {
            tracing::debug!(error = %err, "failed to read converter stderr");
        }
        buf
    })
}

fn collect_stderr(reader: JoinHandle<Vec<u8>>) -> String {
    reader
        .join()
        .map(|buf| stderr_tail(&buf))
        .unwrap_or_default()
}

/// Last few non-blank lines of `raw`, joined with `; `.
fn stderr_tail(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("; ")
}

/// Wait for `child` to exit, killing it if the job is cancelled first.
///
/// Returns `None` when the child was cancelled.
fn wait_or_cancel(
    child: &mut Child,
    control: &JobControl,
    interval: Duration,
) -> Result<Option<ExitStatus>, ConvertError> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }

        if control.is_cancelled() {
            // the child may have exited since try_wait; that is fine
            if let Err(err) = child.kill() {
                tracing::debug!(pid = child.id(), error = %err, "converter already gone");
            }
            if let Err(err) = child.wait() {
                tracing::debug!(pid = child.id(), error = %err, "failed to reap converter");
            }
            return Ok(None);
        }

        thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::presets::PresetCatalog;
    use crate::pipeline::selection::Selection;
    use crossbeam_channel::unbounded;
    use std::path::PathBuf;

    fn job(paths: &[&str], label: &str) -> ConversionJob {
        let preset = PresetCatalog::builtin().find(label).unwrap().clone();
        ConversionJob::new(Selection::from_paths(paths.iter().copied()), preset)
    }

    #[test]
    fn dry_run_reports_each_file_in_order_then_end() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<String> = ["a.wav", "b.wav", "c.wav"]
            .iter()
            .map(|n| dir.path().join(n).to_string_lossy().into_owned())
            .collect();
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let job = job(&refs, "r8000c1i16");
        let options = RunnerOptions {
            dry_run: true,
            ..Default::default()
        };
        let (tx, rx) = unbounded();

        run(&job, &options, &tx, &JobControl::new());

        let messages: Vec<ProgressMessage> = rx.try_iter().collect();
        assert_eq!(messages.len(), 4);
        for (message, name) in messages.iter().zip(["a.wav", "b.wav", "c.wav"]) {
            match message {
                ProgressMessage::Done { name: got, output } => {
                    assert_eq!(got, name);
                    assert!(output.to_string_lossy().ends_with("_r8000_c1_i16.wav"));
                }
                other => panic!("unexpected message {other:?}"),
            }
        }
        assert_eq!(messages[3], ProgressMessage::End);
    }

    #[test]
    fn files_without_extension_are_skipped_silently() {
        let job = job(&["/tmp/noext", "/tmp/x.wav"], "raw");
        let options = RunnerOptions {
            dry_run: true,
            ..Default::default()
        };
        let (tx, rx) = unbounded();

        run(&job, &options, &tx, &JobControl::new());

        let messages: Vec<ProgressMessage> = rx.try_iter().collect();
        assert_eq!(messages.len(), 2);
        assert!(matches!(&messages[0], ProgressMessage::Done { name, .. } if name == "x.wav"));
        assert_eq!(messages[1], ProgressMessage::End);
    }

    #[test]
    fn cancelled_before_start_only_sends_end() {
        let job = job(&["/tmp/a.wav"], "r8000c1i16");
        let control = JobControl::new();
        control.cancel();
        let (tx, rx) = unbounded();

        run(&job, &RunnerOptions::default(), &tx, &control);

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), [ProgressMessage::End]);
    }

    #[test]
    fn missing_tool_is_reported_as_failure() {
        let job = job(&["/tmp/a.wav", "/tmp/b.wav"], "r8000c1i16");
        let options = RunnerOptions {
            tool: "soxconv-definitely-not-installed".into(),
            ..Default::default()
        };
        let (tx, rx) = unbounded();

        run(&job, &options, &tx, &JobControl::new());

        let messages: Vec<ProgressMessage> = rx.try_iter().collect();
        assert_eq!(messages.len(), 3);
        assert!(matches!(&messages[0], ProgressMessage::Failed { name, .. } if name == "a.wav"));
        assert!(matches!(&messages[1], ProgressMessage::Failed { name, .. } if name == "b.wav"));
        assert_eq!(messages[2], ProgressMessage::End);
    }

    #[test]
    fn plan_file_for_raw_export() {
        let job = job(&["/music/a.wav", "/music/b_r8000_c1_i16.wav", "/music/c"], "raw");
        let outputs: Vec<Option<PathBuf>> = job
            .selection
            .files()
            .iter()
            .map(|f| plan_file(f, &job.preset, DEFAULT_TOOL).map(|c| c.output))
            .collect();
        assert_eq!(
            outputs,
            [
                Some(PathBuf::from("/music/a.raw")),
                Some(PathBuf::from("/music/b_r8000_c1_i16.raw")),
                None
            ]
        );
    }

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let raw = b"sox WARN a\n\nsox WARN b\nsox FAIL c\n  sox FAIL d  \n";
        assert_eq!(stderr_tail(raw), "sox WARN b; sox FAIL c; sox FAIL d");
        assert_eq!(stderr_tail(b""), "");
    }
}
