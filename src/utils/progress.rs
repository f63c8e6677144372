//! Progress bar helpers using indicatif

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::pipeline::ProgressIndicator;

/// Create a progress bar for known-length operations
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("    {msg:<40!} [{bar:30.cyan/blue}] {pos}/{len} ({elapsed})")
            .unwrap()
            .progress_chars("█▓▒░"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Terminal progress bar driven by the progress relay
pub struct BarIndicator {
    bar: ProgressBar,
}

impl BarIndicator {
    /// A bar sized for `total` files, hidden until the relay shows it
    pub fn new(total: usize) -> Self {
        let bar = create_progress_bar(total as u64, "");
        bar.set_draw_target(ProgressDrawTarget::hidden());
        Self { bar }
    }
}

impl ProgressIndicator for BarIndicator {
    fn show(&mut self, label: &str) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.set_message(label.to_string());
        self.bar.tick();
    }

    fn pulse(&mut self, label: &str) {
        self.bar.set_message(label.to_string());
        self.bar.inc(1);
    }

    fn hide(&mut self) {
        self.bar.finish_and_clear();
    }
}
