//! Pipeline module - preset selection, path derivation, and background conversion

pub mod command;
pub mod error;
pub mod job;
pub mod menu;
pub mod paths;
pub mod presets;
pub mod relay;
pub mod runner;
pub mod selection;

pub use command::*;
pub use error::ConvertError;
pub use job::*;
pub use menu::*;
pub use paths::*;
pub use presets::*;
pub use relay::*;
pub use runner::*;
pub use selection::*;
