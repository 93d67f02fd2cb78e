//! Machine-readable measurement reports, as printed by `timebandit --json`.
//!
//! Field names follow [`Measurement`]; `best` and `worst` are seconds per
//! loop, `raw_timings` are total seconds per trial.

use crate::result::Measurement;

/// One-line JSON for `measurement`.
pub fn to_json(measurement: &Measurement) -> Result<String, serde_json::Error> {
    serde_json::to_string(measurement)
}

/// Indented JSON for `measurement`, one field per line.
///
/// Non-finite timings (possible only with a custom clock) serialize as `null`.
pub fn to_json_pretty(measurement: &Measurement) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(measurement)
}
