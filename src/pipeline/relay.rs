//! Polling consumer that turns worker messages into progress updates
//!
//! The relay is driven from the control thread: call [`ProgressRelay::tick`]
//! on a fixed interval until it reports [`Tick::Finished`]. Each tick takes
//! at most one message, so a fast batch still shows every file.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};

use super::job::ProgressMessage;

/// Something that can display batch progress
pub trait ProgressIndicator {
    /// Make the indicator visible with an initial label
    fn show(&mut self, label: &str);
    /// Advance by one file and replace the label
    fn pulse(&mut self, label: &str);
    /// Remove the indicator
    fn hide(&mut self);
}

/// Whether the relay wants to be called again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Idle,
    Running,
}

/// Result for one file, as relayed from the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Converted { name: String, output: PathBuf },
    Failed { name: String, reason: String },
}

/// Per-file results collected while relaying, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchTally {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchTally {
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn converted(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Converted { name, output } => Some((name.as_str(), output.as_path())),
            FileOutcome::Failed { .. } => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Failed { name, reason } => Some((name.as_str(), reason.as_str())),
            FileOutcome::Converted { .. } => None,
        })
    }

    pub fn converted_count(&self) -> usize {
        self.converted().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }
}

pub struct ProgressRelay<I> {
    receiver: Receiver<ProgressMessage>,
    indicator: I,
    state: RelayState,
    tally: BatchTally,
}

impl<I: ProgressIndicator> ProgressRelay<I> {
    pub fn new(receiver: Receiver<ProgressMessage>, indicator: I) -> Self {
        Self {
            receiver,
            indicator,
            state: RelayState::Idle,
            tally: BatchTally::default(),
        }
    }

    /// Show the indicator and enter `Running`.
    pub fn start(&mut self) {
        self.tally = BatchTally::default();
        self.indicator.show("Converting");
        self.state = RelayState::Running;
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn tally(&self) -> &BatchTally {
        &self.tally
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    /// Handle at most one pending message.
    pub fn tick(&mut self) -> Tick {
        if self.state == RelayState::Idle {
            return Tick::Finished;
        }

        let message = match self.receiver.try_recv() {
            Ok(message) => message,
            Err(TryRecvError::Empty) => return Tick::Continue,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("conversion worker stopped without sending End");
                self.finish();
                return Tick::Finished;
            }
        };

        match message {
            ProgressMessage::Done { name, output } => {
                self.indicator.pulse(&format!("Converting {name}"));
                self.tally.outcomes.push(FileOutcome::Converted { name, output });
                Tick::Continue
            }
            ProgressMessage::Failed { name, reason } => {
                self.indicator.pulse(&format!("Failed {name}"));
                self.tally.outcomes.push(FileOutcome::Failed { name, reason });
                Tick::Continue
            }
            ProgressMessage::End => {
                if !self.receiver.is_empty() {
                    tracing::error!(
                        pending = self.receiver.len(),
                        "messages left in the queue after End"
                    );
                }
                self.finish();
                Tick::Finished
            }
        }
    }

    /// Tick every `interval` until the batch ends.
    ///
    /// `between_ticks` runs after every tick that did not finish the batch,
    /// e.g. to cancel the job when the user asks for it.
    pub fn run_until_end(&mut self, interval: Duration, mut between_ticks: impl FnMut()) {
        while self.tick() == Tick::Continue {
            between_ticks();
            thread::sleep(interval);
        }
    }

    /// Give the indicator back once the relay is no longer needed.
    pub fn into_parts(self) -> (I, BatchTally) {
        (self.indicator, self.tally)
    }

    fn finish(&mut self) {
        self.indicator.hide();
        self.state = RelayState::Idle;
    }
}
