//! Process-wide automatic collection switch.
//!
//! Rust has no tracing garbage collector, but host code often does deferred
//! reclamation of its own: arena resets, cache sweeps, epoch-based frees.
//! Such code should run its sweeps through [`maybe_collect`] so that a timing
//! trial, which pauses collection with a [`CollectionGuard`], is not polluted
//! by a sweep landing in the middle of the measured loop.
//!
//! # Example
//!
//! ```
//! use timebandit::measurement::gc::{self, CollectionGuard};
//!
//! let before = gc::is_enabled();
//! {
//!     let _guard = CollectionGuard::pause();
//!     assert!(!gc::is_enabled());
//!     // ... timed work ...
//! }
//! assert_eq!(gc::is_enabled(), before);
//! ```
//!
//! The switch is global, not per-timer: overlapping measurements on several
//! threads will see each other's pauses.

use std::sync::atomic::{AtomicBool, Ordering};

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Whether automatic collection is currently enabled.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::SeqCst)
}

/// Enable automatic collection.
pub fn enable() {
    ENABLED.store(true, Ordering::SeqCst);
}

/// Disable automatic collection until [`enable`] is called.
pub fn disable() {
    ENABLED.store(false, Ordering::SeqCst);
}

/// Run `collect` only while collection is enabled.
///
/// Returns whether it ran.
pub fn maybe_collect<F: FnOnce()>(collect: F) -> bool {
    if is_enabled() {
        collect();
        true
    } else {
        false
    }
}

/// RAII guard that pauses automatic collection and restores it on drop.
///
/// Collection is re-enabled on drop only if it was enabled when the guard
/// was created, on every exit path including errors and panics.
#[must_use = "collection is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CollectionGuard {
    was_enabled: bool,
}

impl CollectionGuard {
    /// Disable collection, remembering the previous state.
    pub fn pause() -> Self {
        let was_enabled = ENABLED.swap(false, Ordering::SeqCst);
        tracing::trace!(was_enabled, "automatic collection paused");
        Self { was_enabled }
    }

    /// State of the switch when this guard was created.
    pub fn was_enabled(&self) -> bool {
        self.was_enabled
    }
}

impl Drop for CollectionGuard {
    fn drop(&mut self) {
        if self.was_enabled {
            ENABLED.store(true, Ordering::SeqCst);
        }
        tracing::trace!(restored = self.was_enabled, "automatic collection guard released");
    }
}
