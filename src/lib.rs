//! # timebandit
//!
//! Time small pieces of code.
//!
//! A [`Timer`] runs a target callable many times in a tight loop between two
//! reads of a monotonic clock, and reports elapsed seconds. Two procedures
//! build on that:
//! - [`Timer::autorange`] picks a loop count whose trial takes at least 0.2s
//!   (trying 1, 2, 5, 10, 20, 50, ...)
//! - [`Timer::repeat`] runs several independent trials; the minimum is the
//!   number to report
//!
//! ## ⚠️ Report the minimum, not the mean
//!
//! The fastest trial is a lower bound on how fast the machine can run the
//! code. Slower trials are slowed by other processes, not by the code, so
//! averaging them only adds noise. This crate deliberately computes nothing
//! beyond min and max.
//!
//! ## Quick Start
//!
//! ```
//! use std::hint::black_box;
//! use timebandit::Timer;
//!
//! let mut timer = Timer::new(|| {
//!     black_box(vec![0u8; 64]);
//! })
//! .threshold(0.01);
//!
//! let (number, _) = timer.autorange().unwrap();
//! let trials = timer.repeat(3, number).unwrap();
//! let best = trials.iter().copied().fold(f64::INFINITY, f64::min) / number as f64;
//! println!("best: {:.3e} s per loop", best);
//! ```
//!
//! ## Setup and failures
//!
//! Setup runs once before every trial and is never timed. Setup, and a
//! target built with [`Timer::try_new`], may return a `Result`; the first
//! `Err` ends the trial and comes back as [`Error::Target`] or
//! [`Error::Setup`] with the original error as its source.
//!
//! ```
//! use timebandit::Timer;
//!
//! let mut timer = Timer::try_new(|| "x".parse::<u32>()).with_setup(|| ());
//! let err = timer.timeit(1).unwrap_err();
//! assert!(err
//!     .user_error()
//!     .unwrap()
//!     .downcast_ref::<std::num::ParseIntError>()
//!     .is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod error;
mod result;

// Functional modules
pub mod cli;
pub mod measurement;
pub mod output;

// Re-exports for public API
pub use config::{clamp_repeat, Config};
pub use constants::{
    AUTORANGE_THRESHOLD, DEFAULT_NUMBER, DEFAULT_PRECISION, DEFAULT_REPEAT, UNRELIABLE_RATIO,
};
pub use error::{BoxError, Error, Result};
pub use measurement::{
    autorange_candidates, default_timer, noop, perf_counter, process_time, Clock, ClockFn,
    ClockKind, Outcome, Routine, Timer,
};
pub use result::Measurement;

/// Time `number` calls of `target` with the default clock.
///
/// Shorthand for `Timer::new(target).with_setup(setup).timeit(number)`;
/// pass [`noop`] when there is nothing to set up and [`DEFAULT_NUMBER`] for
/// the usual loop count. The target's return value is discarded; build a
/// [`Timer::try_new`] for a target whose errors should end the trial.
pub fn timeit<F, T, S, P>(target: F, setup: S, number: usize) -> Result<f64>
where
    F: FnMut() -> T,
    S: FnMut() -> P,
    P: Outcome,
{
    Timer::new(target).with_setup(setup).timeit(number)
}

/// Run `repeat` trials of `number` calls of `target` with the default clock.
///
/// Shorthand for `Timer::new(target).with_setup(setup).repeat(repeat, number)`.
pub fn repeat<F, T, S, P>(target: F, setup: S, repeat: usize, number: usize) -> Result<Vec<f64>>
where
    F: FnMut() -> T,
    S: FnMut() -> P,
    P: Outcome,
{
    Timer::new(target).with_setup(setup).repeat(repeat, number)
}
