//! Preset menu construction for a file selection

use std::collections::BTreeSet;

use super::error::ConvertError;
use super::job::ConversionJob;
use super::presets::{is_accepted_extension, Preset, PresetCatalog};
use super::selection::Selection;

pub const MENU_PROVIDER: &str = "SoxMenuProvider";
pub const MENU_LABEL: &str = "SoxConverter...";

/// One activatable menu entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Unique item name, `SoxMenuProvider::<label>`
    pub name: String,
    pub label: String,
    pub job: ConversionJob,
}

/// Top-level menu item with one entry per applicable preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub name: String,
    pub label: String,
    pub entries: Vec<MenuEntry>,
}

impl Menu {
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// The job bound to the entry labelled `label`
    pub fn activate(&self, label: &str) -> Option<&ConversionJob> {
        self.entries.iter().find(|e| e.label == label).map(|e| &e.job)
    }
}

/// Distinct extensions of `selection`, or why it cannot be converted at all.
pub fn selection_extensions(selection: &Selection) -> Result<BTreeSet<String>, ConvertError> {
    if selection.is_empty() {
        return Err(ConvertError::EmptySelection);
    }

    for file in selection.files() {
        match file.extension.as_deref() {
            Some(ext) if is_accepted_extension(ext) => {}
            _ => {
                return Err(ConvertError::UnrecognizedExtension {
                    path: file.path.clone(),
                })
            }
        }
    }

    Ok(selection.extensions())
}

/// Presets that can convert `selection`, or why there are none.
pub fn check_selection<'a>(
    selection: &Selection,
    catalog: &'a PresetCatalog,
) -> Result<Vec<&'a Preset>, ConvertError> {
    let extensions = selection_extensions(selection)?;
    let presets: Vec<&Preset> = catalog
        .presets()
        .iter()
        .filter(|p| p.accepts_all(&extensions))
        .collect();

    if presets.is_empty() {
        return Err(ConvertError::NoApplicablePreset {
            extensions: extensions.into_iter().collect(),
        });
    }
    Ok(presets)
}

/// Build the conversion menu for `selection`.
///
/// Returns `None` when any file lacks an accepted extension or when no
/// preset accepts every extension in the selection.
pub fn build_menu(selection: &Selection, catalog: &PresetCatalog) -> Option<Menu> {
    let presets = match check_selection(selection, catalog) {
        Ok(presets) => presets,
        Err(err) => {
            tracing::debug!(reason = %err, "no conversion menu for selection");
            return None;
        }
    };

    let entries = presets
        .into_iter()
        .map(|preset| MenuEntry {
            name: format!("{MENU_PROVIDER}::{}", preset.label),
            label: preset.label.clone(),
            job: ConversionJob::new(selection.clone(), preset.clone()),
        })
        .collect();

    Some(Menu {
        name: format!("{MENU_PROVIDER}::SoxConverter"),
        label: MENU_LABEL.to_string(),
        entries,
    })
}

/// Resolve `label` into a job for `selection`, checking the preset applies.
pub fn job_for_label(
    selection: &Selection,
    catalog: &PresetCatalog,
    label: &str,
) -> Result<ConversionJob, ConvertError> {
    let preset = catalog
        .find(label)
        .ok_or_else(|| ConvertError::UnknownPreset {
            label: label.to_string(),
        })?;

    let extensions = selection_extensions(selection)?;
    if !preset.accepts_all(&extensions) {
        return Err(ConvertError::PresetNotApplicable {
            label: label.to_string(),
            extensions: extensions.into_iter().collect(),
        });
    }

    Ok(ConversionJob::new(selection.clone(), preset.clone()))
}
