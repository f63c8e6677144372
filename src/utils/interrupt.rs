//! Ctrl-C handling for running batches

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static INTERRUPTED: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// Flag raised on Ctrl-C (and SIGTERM) once the handler is installed.
///
/// The handler is installed on first call and stays for the life of the
/// process. If installation fails the flag is returned but never raised.
pub fn interrupt_flag() -> Arc<AtomicBool> {
    INTERRUPTED
        .get_or_init(|| {
            let flag = Arc::new(AtomicBool::new(false));
            let raised = flag.clone();
            if let Err(err) = ctrlc::set_handler(move || raised.store(true, Ordering::SeqCst)) {
                tracing::warn!(error = %err, "could not install Ctrl-C handler");
            }
            flag
        })
        .clone()
}
