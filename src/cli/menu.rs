//! `menu` and `presets` subcommands

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Table};
use console::style;

use crate::pipeline::{build_menu, check_selection, PresetCatalog, Selection};
use crate::utils::{print_count, print_info};

/// Print the presets offered for `files`, or why none are.
pub fn run_menu(files: &[PathBuf], catalog: &PresetCatalog) -> Result<()> {
    let selection = Selection::from_paths(files.iter().cloned());

    let Some(menu) = build_menu(&selection, catalog) else {
        let reason = match check_selection(&selection, catalog) {
            Err(err) => err.to_string(),
            Ok(_) => "no presets apply".to_string(),
        };
        print_info(&format!("No conversion menu: {}", reason));
        return Ok(());
    };

    println!(
        "\n {} {}",
        style("◆").cyan().bold(),
        style(&menu.label).white().bold()
    );
    print_count(
        "applicable preset(s)",
        menu.entries.len(),
        Some(&format!("for {} file(s)", selection.len())),
    );
    for entry in &menu.entries {
        println!(
            "        {} {} {}",
            style("•").dim(),
            entry.label,
            style(&entry.name).dim()
        );
    }
    println!();
    Ok(())
}

/// Print the catalog as a table, or as JSON when `json` is set.
pub fn run_presets(catalog: &PresetCatalog, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(catalog)
            .context("Failed to serialize preset catalog to JSON")?;
        println!("{}", text);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Label").add_attribute(Attribute::Bold),
        Cell::new("Suffix").add_attribute(Attribute::Bold),
        Cell::new("Output").add_attribute(Attribute::Bold),
        Cell::new("Options").add_attribute(Attribute::Bold),
        Cell::new("Accepts").add_attribute(Attribute::Bold),
    ]);

    for preset in catalog.presets() {
        let options = [&preset.global_opts, &preset.input_opts, &preset.output_opts]
            .iter()
            .filter(|o| !o.is_empty())
            .map(|o| o.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        table.add_row(vec![
            Cell::new(&preset.label),
            Cell::new(if preset.suffix.is_empty() {
                "-"
            } else {
                preset.suffix.as_str()
            }),
            Cell::new(preset.output),
            Cell::new(options),
            Cell::new(preset.accepts.join(", ")),
        ]);
    }

    for line in table.to_string().lines() {
        println!("    {}", line);
    }
    Ok(())
}
