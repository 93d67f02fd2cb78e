//! Error types for timing runs.

use thiserror::Error;

/// Boxed error raised by user code (target or setup).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`Timer`](crate::Timer) operations.
///
/// The library never swallows a failure from user code: the original error
/// value is kept as the `source` and can be recovered with
/// [`Error::user_error`] and `downcast_ref`.
#[derive(Error, Debug)]
pub enum Error {
    /// The setup callable failed before the timed loop started.
    #[error("setup failed")]
    Setup(#[source] BoxError),

    /// The target callable failed inside the timed loop.
    #[error("timed code failed on iteration {iteration}")]
    Target {
        /// Zero-based index of the failing call within the trial.
        iteration: usize,
        /// The error returned by the target.
        #[source]
        source: BoxError,
    },

    /// Every candidate loop count was tried without reaching the threshold.
    #[error(
        "autorange gave up at {number} loops ({elapsed}s) without reaching {threshold}s"
    )]
    AutorangeExhausted {
        /// Last loop count tried.
        number: usize,
        /// Elapsed seconds at that loop count.
        elapsed: f64,
        /// Threshold that was never reached.
        threshold: f64,
    },
}

impl Error {
    /// The error raised by user code, if this failure came from the target or setup.
    pub fn user_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Setup(source) | Error::Target { source, .. } => Some(source.as_ref()),
            Error::AutorangeExhausted { .. } => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug)]
    struct Boom;

    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "boom")
        }
    }

    impl std::error::Error for Boom {}

    #[test]
    fn target_error_keeps_source() {
        let err = Error::Target {
            iteration: 3,
            source: Box::new(Boom),
        };
        assert_eq!(err.to_string(), "timed code failed on iteration 3");
        assert!(err.source().is_some());
        assert!(err.user_error().unwrap().downcast_ref::<Boom>().is_some());
    }

    #[test]
    fn autorange_error_has_no_user_error() {
        let err = Error::AutorangeExhausted {
            number: 5,
            elapsed: 0.0,
            threshold: 0.2,
        };
        assert!(err.user_error().is_none());
        assert!(err.to_string().contains("5 loops"));
    }
}
