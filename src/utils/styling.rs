//! Terminal styling utilities for status output

use console::{style, Emoji};
use std::path::Path;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static WAVE: Emoji<'_, '_> = Emoji("🎚️  ", "");
pub static TOOL: Emoji<'_, '_> = Emoji("🔧 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     ___  ___ __  __  ___ ___  _ ___   __
    / __|/ _ \\ \/ / / __/ _ \| '_ \ \ / /
    \__ \ (_) |>  < | (_| (_) | | | \ V /
    |___/\___//_/\_\ \___\___/|_| |_|\_/
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}",
        style("Batch audio conversion with sox presets").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the job card: preset, tool and file count
pub fn print_config(preset: &str, tool: &str, first_file: &Path, file_count: usize, dry_run: bool) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Conversion").cyan().bold(),
        " ".repeat(box_width - 17)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Preset: {:<39}│",
        WAVE,
        truncate_string(preset, 38)
    );
    println!(
        "    │  {} Tool:   {:<39}│",
        TOOL,
        truncate_string(tool, 38)
    );
    println!(
        "    │  {} Input:  {:<39}│",
        FOLDER,
        truncate_path(first_file, 38)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  Files:   {:<43}│",
        style(file_count).yellow()
    );
    if dry_run {
        println!(
            "    │  {:<52}│",
            style("Dry run: commands are printed, not executed").yellow()
        );
    }
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Conversion complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!(
            "      Found {} {}",
            style(count).yellow().bold(),
            description
        );
    }
}

// Helper functions

pub fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

pub fn truncate_string(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(count - max_len + 3).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_string("r8000c1i16", 38), "r8000c1i16");
    }

    #[test]
    fn truncate_keeps_the_tail() {
        assert_eq!(truncate_string("/very/long/path/file.wav", 12), ".../file.wav");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_string("ééééé.wav", 8), "...é.wav");
    }
}
