//! Converter command assembly
//!
//! sox reads its arguments positionally: global options, input format
//! options, input file, output format options, output file. Headerless
//! inputs (`.raw`, `.pcm`) describe nothing about themselves, so for those
//! the preset's target format is declared as the *input* format instead.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::presets::{is_headerless, Preset};

/// The external tool invoked when nothing else is configured
pub const DEFAULT_TOOL: &str = "sox";

/// The option fragments used for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    pub global: String,
    pub input: String,
    pub output: String,
}

impl OptionSet {
    /// Options for converting a file with extension `input_extension` using `preset`.
    pub fn for_input(preset: &Preset, input_extension: &str) -> Self {
        if is_headerless(input_extension) {
            Self {
                global: String::new(),
                input: format!("{} -t raw", preset.output_opts),
                output: String::new(),
            }
        } else {
            Self {
                global: preset.global_opts.clone(),
                input: preset.input_opts.clone(),
                output: preset.output_opts.clone(),
            }
        }
    }
}

/// One invocation of the external converter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterCommand {
    pub tool: String,
    pub options: OptionSet,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ConverterCommand {
    pub fn new(tool: &str, options: OptionSet, input: &Path, output: &Path) -> Self {
        Self {
            tool: tool.to_string(),
            options,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        }
    }

    /// Argument vector, without the tool itself.
    ///
    /// Option fragments are split on whitespace; each path stays a single
    /// argument regardless of spaces or quotes in it.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        args.extend(self.options.global.split_whitespace().map(OsString::from));
        args.extend(self.options.input.split_whitespace().map(OsString::from));
        args.push(self.input.clone().into_os_string());
        args.extend(self.options.output.split_whitespace().map(OsString::from));
        args.push(self.output.clone().into_os_string());
        args
    }

    /// A ready-to-spawn [`Command`]
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.tool);
        command.args(self.args());
        command
    }
}

impl fmt::Display for ConverterCommand {
    /// Shell form: `<tool> <gopts> <ifopts> '<input>' <ofopts> '<output>'`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.tool,
            self.options.global,
            self.options.input,
            shell_quote(&self.input),
            self.options.output,
            shell_quote(&self.output)
        )
    }
}

/// Single-quote a path for a POSIX shell.
pub fn shell_quote(path: &Path) -> String {
    let text = path.to_string_lossy();
    format!("'{}'", text.replace('\'', r"'\''"))
}
