//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};

use crate::pipeline::Menu;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Let the user pick one entry of `menu`. Returns `None` on escape.
pub fn select_preset(menu: &Menu) -> Result<Option<String>> {
    let labels = menu.labels();
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(menu.label.trim_end_matches('.'))
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|index| labels[index].to_string()))
}

/// Prompt user to confirm converting the selection
pub fn confirm_conversion(file_count: usize, preset: &str) -> Result<bool> {
    let message = format!("Convert {} file(s) with preset {}?", file_count, preset);
    confirm_step(&message)
}
