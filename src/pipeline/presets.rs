//! Conversion presets and the preset catalog
//!
//! A preset bundles the sox option fragments for one target format together
//! with the filename suffix that marks files produced by it. The built-in
//! catalog covers 8/16/44.1/48 kHz mono and stereo 16-bit resampling plus a
//! headerless raw export.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConvertError;

/// Extensions any preset may accept. Files outside this set never get a menu.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["raw", "pcm", "wav"];

/// Returns true when `ext` (already lowercased) is in [`ACCEPTED_EXTENSIONS`].
pub fn is_accepted_extension(ext: &str) -> bool {
    ACCEPTED_EXTENSIONS.contains(&ext)
}

/// Returns true for headerless sample formats that carry no rate/channel metadata.
pub fn is_headerless(ext: &str) -> bool {
    matches!(ext, "raw" | "pcm")
}

/// Container written by a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Wav,
    Raw,
}

impl OutputFormat {
    /// File extension used for outputs of this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Raw => "raw",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A named bundle of sox options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Identifier shown in menus, e.g. `r16000c1i16`
    pub label: String,
    /// Appended to the output file stem; may be empty
    #[serde(default)]
    pub suffix: String,
    pub output: OutputFormat,
    /// Global sox options, placed before the input file
    #[serde(default)]
    pub global_opts: String,
    /// Input format options, placed right before the input file
    #[serde(default)]
    pub input_opts: String,
    /// Output format options, placed right before the output file
    #[serde(default)]
    pub output_opts: String,
    /// Input extensions this preset can convert
    pub accepts: Vec<String>,
}

impl Preset {
    fn resample(rate: u32, channels: u8) -> Self {
        Self {
            label: format!("r{rate}c{channels}i16"),
            suffix: format!("_r{rate}_c{channels}_i16"),
            output: OutputFormat::Wav,
            global_opts: String::new(),
            input_opts: String::new(),
            output_opts: format!("-r {rate} -c {channels} -e signed-integer -b 16"),
            accepts: vec!["wav".into(), "pcm".into(), "raw".into()],
        }
    }

    fn raw_export() -> Self {
        Self {
            label: "raw".into(),
            suffix: String::new(),
            output: OutputFormat::Raw,
            global_opts: "--magic".into(),
            input_opts: String::new(),
            output_opts: "-t raw".into(),
            accepts: vec!["wav".into()],
        }
    }

    /// Returns true when every extension in `extensions` is accepted.
    pub fn accepts_all(&self, extensions: &BTreeSet<String>) -> bool {
        extensions
            .iter()
            .all(|ext| self.accepts.iter().any(|a| a == ext))
    }
}

/// Ordered, immutable list of presets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetCatalog {
    /// The catalog shipped with the tool
    pub fn builtin() -> Self {
        let mut presets = Vec::with_capacity(9);
        for rate in [8000, 16000, 44100, 48000] {
            for channels in [1, 2] {
                presets.push(Preset::resample(rate, channels));
            }
        }
        presets.push(Preset::raw_export());
        Self { presets }
    }

    /// Parse a JSON catalog of the form `{"presets": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, ConvertError> {
        let catalog: Self =
            serde_json::from_str(json).map_err(|e| ConvertError::Catalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a JSON catalog file.
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Look up a preset by label
    pub fn find(&self, label: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.label == label)
    }

    fn validate(&self) -> Result<(), ConvertError> {
        if self.presets.is_empty() {
            return Err(ConvertError::Catalog("catalog contains no presets".into()));
        }

        let mut seen = HashSet::new();
        for preset in &self.presets {
            if preset.label.trim().is_empty() {
                return Err(ConvertError::Catalog("preset label cannot be empty".into()));
            }
            if !seen.insert(preset.label.as_str()) {
                return Err(ConvertError::Catalog(format!(
                    "duplicate preset label '{}'",
                    preset.label
                )));
            }
            if preset.accepts.is_empty() {
                return Err(ConvertError::Catalog(format!(
                    "preset '{}' accepts no input formats",
                    preset.label
                )));
            }
            if let Some(ext) = preset.accepts.iter().find(|e| !is_accepted_extension(e)) {
                return Err(ConvertError::Catalog(format!(
                    "preset '{}' accepts unsupported format '{}'",
                    preset.label, ext
                )));
            }
        }
        Ok(())
    }
}
