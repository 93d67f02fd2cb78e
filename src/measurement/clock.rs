//! Clock functions for timing.
//!
//! A clock is any function returning monotonically non-decreasing seconds as
//! `f64`. Two are provided:
//! - [`perf_counter`]: wall-clock, monotonic, high resolution (`Instant`)
//! - [`process_time`]: CPU time consumed by the whole process

use std::sync::OnceLock;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Source of timestamps in seconds.
///
/// Implemented for every `Fn() -> f64`, so plain functions and closures can
/// be used directly.
pub trait Clock {
    /// Read the clock.
    fn now(&self) -> f64;
}

impl<F> Clock for F
where
    F: Fn() -> f64,
{
    #[inline]
    fn now(&self) -> f64 {
        self()
    }
}

/// Function-pointer clock, the type returned by [`default_timer`].
pub type ClockFn = fn() -> f64;

/// Monotonic high-resolution clock, in seconds since the first read in this process.
#[inline]
pub fn perf_counter() -> f64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();

    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// CPU time (user + system) consumed by this process, in seconds.
///
/// Sleeping does not advance this clock.
#[cfg(unix)]
pub fn process_time() -> f64 {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, &mut ts) };
    if rc != 0 {
        tracing::warn!(
            error = %std::io::Error::last_os_error(),
            "process CPU clock unavailable"
        );
        return 0.0;
    }
    ts.tv_sec as f64 + ts.tv_nsec as f64 * 1e-9
}

/// CPU time consumed by this process, in seconds.
///
/// Without a process CPU clock on this platform, falls back to [`perf_counter`].
#[cfg(not(unix))]
pub fn process_time() -> f64 {
    perf_counter()
}

/// The platform's default timing clock.
///
/// Returns the clock *function*; every call through it reads a fresh
/// timestamp.
pub fn default_timer() -> ClockFn {
    perf_counter
}

/// Selector for the built-in clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockKind {
    /// [`perf_counter`].
    #[default]
    Perf,
    /// [`process_time`].
    Process,
}

impl ClockKind {
    /// The clock function this selector stands for.
    pub fn as_fn(self) -> ClockFn {
        match self {
            ClockKind::Perf => perf_counter,
            ClockKind::Process => process_time,
        }
    }

    /// Short name used in reports and configuration.
    pub fn name(self) -> &'static str {
        match self {
            ClockKind::Perf => "perf",
            ClockKind::Process => "process",
        }
    }

    /// Parse a configuration value (`perf` or `process`, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "perf" | "perf_counter" => Some(ClockKind::Perf),
            "process" | "process_time" => Some(ClockKind::Process),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hint::black_box;
    use std::time::Duration;

    #[test]
    fn test_perf_counter_monotonic() {
        let a = perf_counter();
        let b = perf_counter();
        assert!(a >= 0.0);
        assert!(b >= a, "a={}, b={}", a, b);
    }

    #[test]
    fn test_perf_counter_tracks_sleep() {
        let start = perf_counter();
        std::thread::sleep(Duration::from_millis(20));
        let elapsed = perf_counter() - start;
        assert!(elapsed >= 0.015, "elapsed = {}", elapsed);
    }

    #[test]
    fn test_default_timer_reads_fresh_values() {
        let timer = default_timer();
        let a = timer();
        std::thread::sleep(Duration::from_millis(2));
        let b = timer();
        assert!(b > a, "default timer returned a stale value: {} then {}", a, b);
    }

    #[test]
    fn test_process_time_advances_with_work() {
        let start = process_time();
        let mut sum = 0u64;
        for i in 0..5_000_000u64 {
            sum = sum.wrapping_add(black_box(i));
        }
        black_box(sum);
        assert!(process_time() >= start);
    }

    #[test]
    fn test_closure_is_a_clock() {
        let clock = || 42.0;
        assert_eq!(clock.now(), 42.0);
    }

    #[test]
    fn test_clock_kind_parse() {
        assert_eq!(ClockKind::parse("perf"), Some(ClockKind::Perf));
        assert_eq!(ClockKind::parse(" PROCESS "), Some(ClockKind::Process));
        assert_eq!(ClockKind::parse("wall"), None);
        assert_eq!(ClockKind::default().name(), "perf");
    }
}
