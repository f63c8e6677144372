//! Utility module - terminal styling, progress display, logging and Ctrl-C handling

pub mod interrupt;
pub mod logging;
pub mod progress;
pub mod styling;

pub use interrupt::*;
pub use logging::*;
pub use progress::*;
pub use styling::*;
