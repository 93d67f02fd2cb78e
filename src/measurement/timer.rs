//! The `Timer`: trials, repeats, and automatic loop-count selection.

use std::hint::black_box;

use super::clock::{default_timer, Clock, ClockFn};
use super::gc::CollectionGuard;
use super::routine::{noop, Outcome, Routine};
use crate::config::Config;
use crate::constants::AUTORANGE_THRESHOLD;
use crate::error::{Error, Result};

/// Loop counts tried by [`Timer::autorange`]: 1, 2, 5, 10, 20, 50, ...
///
/// The sequence ends before any count would overflow `usize`.
pub fn autorange_candidates() -> impl Iterator<Item = usize> {
    std::iter::successors(Some(1usize), |decade| decade.checked_mul(10)).flat_map(|decade| {
        [1usize, 2, 5]
            .into_iter()
            .filter_map(move |step| decade.checked_mul(step))
    })
}

/// Times a target callable.
///
/// # Example
///
/// ```
/// use timebandit::Timer;
///
/// let mut timer = Timer::new(|| (0..64u64).sum::<u64>());
/// let trials = timer.repeat(3, 1_000).unwrap();
/// let best = trials.iter().copied().fold(f64::INFINITY, f64::min);
/// assert!(best >= 0.0);
/// ```
///
/// [`Timer::new`] accepts a target returning any value; the value goes
/// through `black_box` and is dropped. A target that can fail goes through
/// [`Timer::try_new`] instead: it returns `()` or a `Result`, and an `Err`
/// ends the trial as [`Error::Target`]. Setup follows the same rule as
/// `try_new` and fails as [`Error::Setup`].
#[derive(Debug, Clone)]
pub struct Timer<F, S = fn(), C = ClockFn> {
    routine: Routine<F, S>,
    clock: C,
    threshold: f64,
}

impl<F, T> Timer<F>
where
    F: FnMut() -> T,
{
    /// Time `target` with no setup, the default clock, and the default
    /// autorange threshold.
    ///
    /// Whatever `target` returns is passed to `black_box` and discarded, so
    /// a `Result` returned here is never inspected. Use
    /// [`try_new`](Timer::try_new) for targets that report failure.
    pub fn new(mut target: F) -> Timer<impl FnMut()> {
        Timer::try_new(move || {
            black_box(target());
        })
    }

    /// Like [`new`](Timer::new), with the clock and threshold from `config`.
    pub fn from_config(target: F, config: &Config) -> Timer<impl FnMut()> {
        Timer::new(target)
            .with_clock(config.clock.as_fn())
            .threshold(config.threshold)
    }
}

impl<F, O> Timer<F>
where
    F: FnMut() -> O,
    O: Outcome,
{
    /// Time a fallible `target`: the first `Err` it returns ends the trial.
    pub fn try_new(target: F) -> Self {
        Self {
            routine: Routine::new(target, noop as fn()),
            clock: default_timer(),
            threshold: AUTORANGE_THRESHOLD,
        }
    }
}

impl<F, S, C> Timer<F, S, C> {
    /// Run `setup` once before each trial. Its time is not measured.
    pub fn with_setup<S2, P>(self, setup: S2) -> Timer<F, S2, C>
    where
        S2: FnMut() -> P,
        P: Outcome,
    {
        Timer {
            routine: self.routine.with_setup(setup),
            clock: self.clock,
            threshold: self.threshold,
        }
    }

    /// Use `clock` instead of the default timer.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Timer<F, S, C2> {
        Timer {
            routine: self.routine,
            clock,
            threshold: self.threshold,
        }
    }

    /// Set the elapsed seconds autorange must reach (default 0.2).
    ///
    /// Only positive finite values are accepted; anything else is logged and
    /// leaves the current threshold in place.
    pub fn threshold(mut self, seconds: f64) -> Self {
        if seconds.is_finite() && seconds > 0.0 {
            self.threshold = seconds;
        } else {
            tracing::warn!(seconds, kept = self.threshold, "ignoring invalid autorange threshold");
        }
        self
    }

    /// The autorange threshold in seconds.
    pub fn threshold_secs(&self) -> f64 {
        self.threshold
    }

    /// The clock used for trials.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<F, S, C, O, P> Timer<F, S, C>
where
    F: FnMut() -> O,
    O: Outcome,
    S: FnMut() -> P,
    P: Outcome,
    C: Clock,
{
    /// Time `number` calls of the target, returning total seconds.
    ///
    /// Setup runs once first and is not timed. Automatic collection is
    /// paused for the trial and restored afterwards, whether the trial
    /// succeeds, fails, or panics.
    pub fn timeit(&mut self, number: usize) -> Result<f64> {
        let elapsed = {
            let _paused = CollectionGuard::pause();
            self.routine.run(number, &self.clock)
        }?;

        tracing::trace!(number, elapsed, "trial finished");
        Ok(elapsed)
    }

    /// Call [`timeit`](Self::timeit) `repeat` times, returning every result in order.
    ///
    /// No aggregate is computed. The minimum is the figure to look at: it is
    /// a lower bound on how fast the code can run, while larger values are
    /// inflated by other processes rather than by the code itself.
    pub fn repeat(&mut self, repeat: usize, number: usize) -> Result<Vec<f64>> {
        let mut trials = Vec::with_capacity(repeat);
        for _ in 0..repeat {
            trials.push(self.timeit(number)?);
        }
        Ok(trials)
    }

    /// Find a loop count whose trial takes at least the threshold.
    ///
    /// Tries 1, 2, 5, 10, 20, 50, ... and returns `(number, time_taken)` for
    /// the first count that reaches the threshold.
    pub fn autorange(&mut self) -> Result<(usize, f64)> {
        self.autorange_with(|_, _| {})
    }

    /// Like [`autorange`](Self::autorange), calling `callback(number, time_taken)`
    /// after every trial.
    pub fn autorange_with<CB>(&mut self, mut callback: CB) -> Result<(usize, f64)>
    where
        CB: FnMut(usize, f64),
    {
        let mut last = (0, 0.0);
        for number in autorange_candidates() {
            let time_taken = self.timeit(number)?;
            callback(number, time_taken);
            if time_taken >= self.threshold {
                tracing::debug!(number, time_taken, threshold = self.threshold, "autorange settled");
                return Ok((number, time_taken));
            }
            last = (number, time_taken);
        }

        Err(Error::AutorangeExhausted {
            number: last.0,
            elapsed: last.1,
            threshold: self.threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_candidate_prefix() {
        let first: Vec<usize> = autorange_candidates().take(9).collect();
        assert_eq!(first, vec![1, 2, 5, 10, 20, 50, 100, 200, 500]);
    }

    #[test]
    fn test_candidates_end_before_overflow() {
        let last = autorange_candidates().last().unwrap();
        assert!(last > usize::MAX / 10);
        assert!(autorange_candidates().count() < 64);
    }

    #[test]
    fn test_autorange_simulated() {
        // Each call costs 1/32 s: 1 -> 0.03125, 2 -> 0.0625, 5 -> 0.15625, 10 -> 0.3125.
        let now = Cell::new(0.0f64);
        let mut timer = Timer::new(|| now.set(now.get() + 0.03125)).with_clock(|| now.get());

        let mut seen = Vec::new();
        let (number, time_taken) = timer.autorange_with(|n, t| seen.push((n, t))).unwrap();

        assert_eq!(number, 10);
        assert_eq!(time_taken, 0.3125);
        assert_eq!(
            seen,
            vec![(1, 0.03125), (2, 0.0625), (5, 0.15625), (10, 0.3125)]
        );
    }

    #[test]
    fn test_autorange_slow_target_returns_one() {
        let now = Cell::new(0.0f64);
        let mut timer = Timer::new(|| now.set(now.get() + 1.5)).with_clock(|| now.get());

        assert_eq!(timer.autorange().unwrap(), (1, 1.5));
    }

    #[test]
    fn test_autorange_custom_threshold() {
        let now = Cell::new(0.0f64);
        let mut timer = Timer::new(|| now.set(now.get() + 0.125))
            .with_clock(|| now.get())
            .threshold(1.0);

        assert_eq!(timer.threshold_secs(), 1.0);
        assert_eq!(timer.autorange().unwrap(), (10, 1.25));
    }

    #[test]
    fn test_repeat_counts_and_order() {
        // Trial k (1-based) costs k seconds because the per-call cost grows.
        let now = Cell::new(0.0f64);
        let cost = Cell::new(0.0f64);
        let mut timer = Timer::new(|| now.set(now.get() + cost.get()))
            .with_setup(|| cost.set(cost.get() + 1.0))
            .with_clock(|| now.get());

        let trials = timer.repeat(3, 1).unwrap();
        assert_eq!(trials, vec![1.0, 2.0, 3.0]);
        assert!(timer.repeat(0, 10).unwrap().is_empty());
    }

    #[test]
    fn test_repeat_stops_on_first_failure() {
        let calls = Cell::new(0usize);
        let mut timer = Timer::try_new(|| {
            calls.set(calls.get() + 1);
            if calls.get() > 4 {
                Err("exhausted")
            } else {
                Ok(())
            }
        });

        let err = timer.repeat(5, 2).unwrap_err();
        assert!(matches!(err, Error::Target { iteration: 0, .. }));
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn test_value_returning_target() {
        let calls = Cell::new(0u64);
        let mut timer = Timer::new(|| {
            calls.set(calls.get() + 1);
            vec![calls.get(); 4]
        });

        assert!(timer.timeit(10).unwrap() >= 0.0);
        assert_eq!(calls.get(), 10);
    }

    #[test]
    fn test_new_does_not_inspect_results() {
        let mut timer = Timer::new(|| "x".parse::<u32>());
        assert!(timer.timeit(3).is_ok());

        let mut timer = Timer::try_new(|| "x".parse::<u32>());
        assert!(matches!(timer.timeit(3), Err(Error::Target { iteration: 0, .. })));
    }

    #[test]
    fn test_invalid_threshold_ignored() {
        for bad in [f64::NAN, f64::INFINITY, 0.0, -1.0] {
            let timer = Timer::new(|| ()).threshold(bad);
            assert_eq!(timer.threshold_secs(), AUTORANGE_THRESHOLD, "threshold({})", bad);
        }
        let timer = Timer::new(|| ()).threshold(0.5).threshold(f64::NAN);
        assert_eq!(timer.threshold_secs(), 0.5);
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            threshold: 0.5,
            clock: crate::ClockKind::Process,
            ..Config::default()
        };
        let timer = Timer::from_config(|| (), &config);
        assert_eq!(timer.threshold_secs(), 0.5);
        assert!(timer.clock().now() >= 0.0);
    }
}
