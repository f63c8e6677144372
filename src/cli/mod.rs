//! CLI module - argument parsing, interactive prompts, and subcommands

mod args;
pub mod convert;
pub mod menu;
mod prompts;

pub use args::{Cli, Commands};
pub use convert::{resolve_job, run_convert, ConvertRequest};
pub use menu::{run_menu, run_presets};
pub use prompts::*;
