//! Report module - summarizing conversion results

pub mod batch_export;
pub mod summary;

pub use batch_export::*;
pub use summary::*;
