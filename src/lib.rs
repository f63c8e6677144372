//! soxconv: Audio Conversion Library
//!
//! Preset selection, output path derivation, and background sox conversion
//! with polled progress reporting.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
