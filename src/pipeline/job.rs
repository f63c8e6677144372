//! Conversion jobs, their messages, and the background worker that runs them

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver};

use super::error::ConvertError;
use super::presets::Preset;
use super::runner::{run, RunnerOptions};
use super::selection::Selection;

/// A selection bound to the preset the user picked for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub selection: Selection,
    pub preset: Preset,
}

impl ConversionJob {
    pub fn new(selection: Selection, preset: Preset) -> Self {
        Self { selection, preset }
    }
}

/// Messages sent from the worker to the progress relay, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressMessage {
    /// A file finished converting
    Done { name: String, output: PathBuf },
    /// A file could not be converted; the batch continues
    Failed { name: String, reason: String },
    /// No more messages follow
    End,
}

/// PIDs of converter processes that are currently running for one job.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    pids: Arc<Mutex<BTreeSet<u32>>>,
}

impl InFlightRegistry {
    pub fn insert(&self, pid: u32) {
        self.lock().insert(pid);
    }

    pub fn remove(&self, pid: u32) {
        self.lock().remove(&pid);
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<u32> {
        self.lock().iter().copied().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<u32>> {
        // a poisoned set still holds valid PIDs
        self.pids.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Cancellation flag and in-flight registry shared by a job and its worker
#[derive(Debug, Clone, Default)]
pub struct JobControl {
    cancelled: Arc<AtomicBool>,
    in_flight: InFlightRegistry,
}

impl JobControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }
}

/// Allows one running job at a time.
///
/// Starting a job while the previous one has not sent `End` yet fails with
/// [`ConvertError::JobAlreadyRunning`].
#[derive(Debug, Clone, Default)]
pub struct JobSlot {
    busy: Arc<AtomicBool>,
}

impl JobSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Spawn a worker thread for `job`.
    pub fn start(
        &self,
        job: ConversionJob,
        options: RunnerOptions,
    ) -> Result<RunningJob, ConvertError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ConvertError::JobAlreadyRunning);
        }

        let (sender, receiver) = unbounded();
        let control = JobControl::new();
        let worker_control = control.clone();
        let release = SlotRelease(self.busy.clone());
        let total = job.selection.len();

        tracing::info!(
            preset = %job.preset.label,
            files = total,
            "starting conversion job"
        );

        let spawned = thread::Builder::new()
            .name("soxconv-worker".into())
            .spawn(move || {
                let _release = release;
                run(&job, &options, &sender, &worker_control);
            });

        // on spawn failure the closure (and the release guard in it) is dropped
        let worker = spawned.map_err(ConvertError::Io)?;

        Ok(RunningJob {
            receiver,
            control,
            worker: Some(worker),
            total,
        })
    }
}

/// Clears the slot's busy flag when the worker exits, however it exits.
struct SlotRelease(Arc<AtomicBool>);

impl Drop for SlotRelease {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle to a job whose worker is running in the background
#[derive(Debug)]
pub struct RunningJob {
    receiver: Receiver<ProgressMessage>,
    control: JobControl,
    worker: Option<JoinHandle<()>>,
    total: usize,
}

impl RunningJob {
    /// Receiving end of the job's message channel
    pub fn receiver(&self) -> Receiver<ProgressMessage> {
        self.receiver.clone()
    }

    /// Number of files in the job's selection
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn control(&self) -> &JobControl {
        &self.control
    }

    /// Stop the job: kill the running converter, skip the remaining files,
    /// and wait for the worker to exit.
    pub fn cancel(&mut self) {
        tracing::info!(
            in_flight = ?self.control.in_flight().snapshot(),
            "cancelling conversion job"
        );
        self.control.cancel();
        self.join();
    }

    /// Wait for the worker to finish.
    pub fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("conversion worker panicked");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, |w| w.is_finished())
    }
}
