use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Trait for checking if computation should be cancelled
pub trait CancellationChecker: Clone + Send + Sync {
    /// Returns true if computation should be cancelled
    fn is_cancelled(&self) -> bool;
}

/// Never cancels - for single-threaded or non-cancellable contexts
#[derive(Clone, Copy, Default)]
pub struct NeverCancel;

impl CancellationChecker for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Checks an atomic boolean flag for cancellation
#[derive(Clone)]
pub struct AtomicBoolChecker {
    flag: Arc<AtomicBool>,
}

impl AtomicBoolChecker {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }
}

impl CancellationChecker for AtomicBoolChecker {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Write side of a run's cancellation flag.
///
/// A fresh token is created for every run. Workers only ever see the
/// read-only [`AtomicBoolChecker`] handed out by [`CancellationToken::checker`].
/// A token may be cancelled before its run starts, but it is bound to at most
/// one run.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    claimed: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Returns true only for the call that set the flag.
    pub fn cancel(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn checker(&self) -> AtomicBoolChecker {
        AtomicBoolChecker::new(Arc::clone(&self.flag))
    }

    /// Bind the token to a run. Returns false if it was already bound.
    pub(crate) fn claim(&self) -> bool {
        !self.claimed.swap(true, Ordering::SeqCst)
    }
}

/// Cancelled as soon as either of two checkers is.
#[derive(Clone)]
pub struct CancelEither<A, B> {
    first: A,
    second: B,
}

impl<A: CancellationChecker, B: CancellationChecker> CancelEither<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: CancellationChecker, B: CancellationChecker> CancellationChecker for CancelEither<A, B> {
    fn is_cancelled(&self) -> bool {
        self.first.is_cancelled() || self.second.is_cancelled()
    }
}
