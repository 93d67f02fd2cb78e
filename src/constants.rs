//! Default values shared by the library and the command-line tool.

/// Loops per trial when the caller does not pick a number.
pub const DEFAULT_NUMBER: usize = 1_000_000;

/// Trials per `repeat` call when the caller does not pick a count.
pub const DEFAULT_REPEAT: usize = 5;

/// Elapsed seconds a trial must reach before autorange settles.
pub const AUTORANGE_THRESHOLD: f64 = 0.2;

/// Worst/best ratio at or above which results are reported as unreliable.
pub const UNRELIABLE_RATIO: f64 = 4.0;

/// Significant digits used when printing times.
pub const DEFAULT_PRECISION: usize = 3;
