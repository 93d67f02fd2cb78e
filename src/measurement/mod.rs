//! Measurement infrastructure.
//!
//! This module provides:
//! - Clock functions (`perf_counter`, `process_time`) behind the [`Clock`] trait
//! - The [`Routine`]: one untimed setup call, then N target calls between two clock reads
//! - The [`Timer`] with `timeit`, `repeat` and `autorange`
//! - A process-wide automatic collection switch ([`gc`]), paused for every trial
//!
//! # Timing discipline
//!
//! Nothing runs between the two clock reads of a trial except the counted
//! loop over the target: no logging, no allocation, no bookkeeping. There is
//! no warm-up either; repeat the measurement and keep the minimum.

mod clock;
pub mod gc;
mod routine;
mod timer;

pub use clock::{default_timer, perf_counter, process_time, Clock, ClockFn, ClockKind};
pub use routine::{noop, Outcome, Routine};
pub use timer::{autorange_candidates, Timer};
