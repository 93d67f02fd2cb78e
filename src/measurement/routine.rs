//! The timed unit of work: one setup call, then N target calls between two clock reads.

use std::hint::black_box;

use super::clock::Clock;
use crate::error::{BoxError, Error, Result};

/// Return value of a timed or setup callable.
///
/// `()` never fails. `Result<T, E>` fails on `Err`; the `Ok` value goes
/// through `black_box` so the computation producing it is not optimized away.
pub trait Outcome {
    /// Convert into success or the user's error.
    fn into_result(self) -> Result<(), BoxError>;
}

impl Outcome for () {
    #[inline]
    fn into_result(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<T, E> Outcome for Result<T, E>
where
    E: Into<BoxError>,
{
    #[inline]
    fn into_result(self) -> Result<(), BoxError> {
        match self {
            Ok(value) => {
                black_box(value);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Setup that does nothing.
#[inline]
pub fn noop() {}

/// A target bound to its setup.
///
/// [`Routine::run`] calls `setup` once, untimed, then measures exactly
/// `number` calls to `target`.
#[derive(Debug, Clone)]
pub struct Routine<F, S> {
    target: F,
    setup: S,
}

impl<F, S> Routine<F, S> {
    /// Bind a target and a setup.
    pub fn new(target: F, setup: S) -> Self {
        Self { target, setup }
    }

    /// Replace the setup, keeping the target.
    pub fn with_setup<S2>(self, setup: S2) -> Routine<F, S2> {
        Routine {
            target: self.target,
            setup,
        }
    }
}

impl<F, S, O, P> Routine<F, S>
where
    F: FnMut() -> O,
    O: Outcome,
    S: FnMut() -> P,
    P: Outcome,
{
    /// Run setup once, then time `number` calls to the target.
    ///
    /// Returns the seconds between the clock read just before the loop and
    /// the one just after it. The first failing call ends the trial; no
    /// partial time is returned.
    #[inline]
    pub fn run<C>(&mut self, number: usize, clock: &C) -> Result<f64>
    where
        C: Clock + ?Sized,
    {
        (self.setup)().into_result().map_err(Error::Setup)?;

        let target = &mut self.target;
        let start = clock.now();
        for iteration in 0..number {
            if let Err(source) = black_box(target()).into_result() {
                return Err(Error::Target { iteration, source });
            }
        }
        let end = clock.now();

        Ok(end - start)
    }
}
