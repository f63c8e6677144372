//! Batch summary report

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::BatchTally;

/// Outcome of one conversion batch
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub preset: String,
    pub total_files: usize,
    pub results: BatchTally,
    pub elapsed: Duration,
    /// The batch was stopped before every file was processed
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn new(preset: &str, total_files: usize) -> Self {
        Self {
            preset: preset.to_string(),
            total_files,
            ..Default::default()
        }
    }

    /// Take over the per-file results collected by the relay
    pub fn record(&mut self, tally: BatchTally) {
        self.results = tally;
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn converted_count(&self) -> usize {
        self.results.converted_count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.failed_count()
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    /// Files that produced neither a result nor a failure (no extension, or cancelled)
    pub fn skipped(&self) -> usize {
        self.total_files.saturating_sub(self.results.processed())
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("CONVERSION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("🎚️  Preset"), Cell::new(&self.preset)]);
        table.add_row(vec![
            Cell::new("📁 Selected Files"),
            Cell::new(self.total_files),
        ]);
        table.add_row(vec![
            Cell::new("✅ Converted"),
            Cell::new(self.converted_count())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("❌ Failed"),
            Cell::new(self.failed_count()).fg(if self.failed_count() == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("⏭️  Skipped"),
            Cell::new(self.skipped()).fg(if self.skipped() == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        if self.cancelled {
            table.add_row(vec![
                Cell::new("🛑 Cancelled"),
                Cell::new("yes").fg(Color::Yellow),
            ]);
        }
        table.add_row(vec![
            Cell::new("⏱️  Elapsed"),
            Cell::new(format!("{:.2}s", self.elapsed.as_secs_f64())),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if self.converted_count() > 0 {
            println!();
            println!(
                "      {} {}:",
                style("Written").green(),
                style(format!("({})", self.converted_count())).dim()
            );
            for (_, output) in self.results.converted() {
                println!("        {} {}", style("•").dim(), output.display());
            }
        }

        if self.failed_count() > 0 {
            println!();
            println!(
                "      {} {}:",
                style("Failed").red(),
                style(format!("({})", self.failed_count())).dim()
            );
            for (name, reason) in self.results.failed() {
                println!("        {} {} {}", style("•").dim(), name, style(reason).dim());
            }
        }
    }
}
