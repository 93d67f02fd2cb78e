//! Output formatting for measurements.
//!
//! - [`terminal`]: `%g`-style numbers, unit scaling, summary and warning lines
//! - [`json`]: machine-readable serialization

pub mod json;
pub mod terminal;

pub use terminal::{format_failure, format_g, format_time, TimeUnit};
