//! Summary of a best-of-N measurement.

use serde::{Deserialize, Serialize};

use crate::constants::UNRELIABLE_RATIO;
use crate::measurement::ClockKind;

/// Raw trial timings plus the per-loop best and worst.
///
/// Only the minimum and maximum are derived; mean and standard deviation are
/// left out on purpose, since slow trials reflect interference rather than
/// the code being timed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Loops per trial.
    pub number: usize,

    /// Number of trials.
    pub repeat: usize,

    /// Whether `number` was chosen by autorange.
    pub autoranged: bool,

    /// Clock used for the trials.
    pub clock: ClockKind,

    /// Total seconds per trial, in the order the trials ran.
    pub raw_timings: Vec<f64>,

    /// Fastest trial, in seconds per loop.
    pub best: f64,

    /// Slowest trial, in seconds per loop.
    pub worst: f64,
}

impl Measurement {
    /// Summarize `raw_timings` taken at `number` loops per trial.
    pub fn new(number: usize, raw_timings: Vec<f64>, clock: ClockKind, autoranged: bool) -> Self {
        let loops = number.max(1) as f64;
        let (best, worst) = if raw_timings.is_empty() {
            (0.0, 0.0)
        } else {
            raw_timings
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
                    (lo.min(t), hi.max(t))
                })
        };

        Self {
            number,
            repeat: raw_timings.len(),
            autoranged,
            clock,
            raw_timings,
            best: best / loops,
            worst: worst / loops,
        }
    }

    /// Seconds per loop for each trial.
    pub fn per_loop(&self) -> Vec<f64> {
        let loops = self.number.max(1) as f64;
        self.raw_timings.iter().map(|t| t / loops).collect()
    }

    /// True when the slowest trial took at least four times the fastest.
    pub fn is_unreliable(&self) -> bool {
        !self.raw_timings.is_empty() && self.worst >= self.best * UNRELIABLE_RATIO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_and_worst_per_loop() {
        let m = Measurement::new(100, vec![0.5, 0.25, 0.75], ClockKind::Perf, false);
        assert_eq!(m.repeat, 3);
        assert_eq!(m.best, 0.0025);
        assert_eq!(m.worst, 0.0075);
        assert_eq!(m.per_loop(), vec![0.005, 0.0025, 0.0075]);
        assert!(!m.is_unreliable());
    }

    #[test]
    fn test_unreliable_at_four_times() {
        let m = Measurement::new(1, vec![1.0, 4.0], ClockKind::Perf, true);
        assert!(m.is_unreliable());

        let m = Measurement::new(1, vec![1.0, 3.99], ClockKind::Perf, true);
        assert!(!m.is_unreliable());
    }

    #[test]
    fn test_empty_timings() {
        let m = Measurement::new(10, Vec::new(), ClockKind::Process, false);
        assert_eq!(m.repeat, 0);
        assert_eq!(m.best, 0.0);
        assert!(!m.is_unreliable());
    }
}
