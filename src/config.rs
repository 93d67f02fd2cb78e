//! Configuration for measurement runs.

use std::env;

use crate::constants::{AUTORANGE_THRESHOLD, DEFAULT_REPEAT};
use crate::measurement::ClockKind;

/// Settings for a best-of-N measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Loops per trial. `None` means pick one with autorange (default).
    pub number: Option<usize>,

    /// Trials to run (default: 5). Never below 1.
    pub repeat: usize,

    /// Seconds a trial must reach for autorange to settle (default: 0.2).
    pub threshold: f64,

    /// Clock used for trials (default: `Perf`).
    pub clock: ClockKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number: None,
            repeat: DEFAULT_REPEAT,
            threshold: AUTORANGE_THRESHOLD,
            clock: ClockKind::Perf,
        }
    }
}

impl Config {
    /// Defaults overridden by environment variables.
    ///
    /// - `TIMEBANDIT_NUMBER`: loops per trial, `0` for autorange
    /// - `TIMEBANDIT_REPEAT`: trials, clamped to at least 1
    /// - `TIMEBANDIT_THRESHOLD`: autorange threshold in seconds
    /// - `TIMEBANDIT_CLOCK`: `perf` or `process`
    ///
    /// Values that do not parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(n) = parse_usize(&lookup, "TIMEBANDIT_NUMBER") {
            config.number = (n > 0).then_some(n);
        }
        if let Some(r) = parse_i64(&lookup, "TIMEBANDIT_REPEAT") {
            config.repeat = clamp_repeat(r);
        }
        if let Some(t) = parse_f64(&lookup, "TIMEBANDIT_THRESHOLD") {
            if t.is_finite() && t > 0.0 {
                config.threshold = t;
            }
        }
        if let Some(clock) = lookup("TIMEBANDIT_CLOCK").and_then(|v| ClockKind::parse(&v)) {
            config.clock = clock;
        }

        config
    }
}

/// Repeat counts below 1 are treated as 1.
pub fn clamp_repeat(repeat: i64) -> usize {
    usize::try_from(repeat.max(1)).unwrap_or(usize::MAX)
}

fn parse_usize<L: Fn(&str) -> Option<String>>(lookup: &L, key: &str) -> Option<usize> {
    lookup(key)?.trim().parse().ok()
}

fn parse_i64<L: Fn(&str) -> Option<String>>(lookup: &L, key: &str) -> Option<i64> {
    lookup(key)?.trim().parse().ok()
}

fn parse_f64<L: Fn(&str) -> Option<String>>(lookup: &L, key: &str) -> Option<f64> {
    lookup(key)?.trim().parse().ok()
}
