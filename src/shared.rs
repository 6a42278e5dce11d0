//! The one piece of state every worker of a job writes to.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

/// Why a job stopped before exhausting its candidates without a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// External interrupt, e.g. Ctrl-C.
    Interrupted,
    /// The job-level deadline passed.
    TimedOut,
}

#[derive(Debug, Default)]
struct ResultState {
    found: Option<String>,
    cancelled: Option<CancelReason>,
}

/// Winner gate and stop flag for one job.
///
/// `found` moves from empty to a value at most once: [`SharedResult::try_claim`]
/// checks and sets it under the same mutex. `stopped` mirrors "found or
/// cancelled" so workers can poll it without taking the lock.
#[derive(Debug, Default)]
pub struct SharedResult {
    state: Mutex<ResultState>,
    stopped: AtomicBool,
}

impl SharedResult {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ResultState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `candidate` as the winner. Returns `false` if another worker
    /// already won; the existing winner is left untouched.
    pub fn try_claim(&self, candidate: &str) -> bool {
        let mut state = self.lock();
        if state.found.is_some() {
            return false;
        }
        state.found = Some(candidate.to_string());
        self.stopped.store(true, Ordering::Release);
        true
    }

    /// Stop all workers. The first reason recorded is kept.
    pub fn cancel(&self, reason: CancelReason) {
        let mut state = self.lock();
        if state.cancelled.is_none() {
            state.cancelled = Some(reason);
        }
        self.stopped.store(true, Ordering::Release);
    }

    /// Whether workers should stop taking candidates.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    pub fn found(&self) -> Option<String> {
        self.lock().found.clone()
    }

    pub fn cancelled(&self) -> Option<CancelReason> {
        self.lock().cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_claim_wins() {
        let shared = SharedResult::new();
        assert!(!shared.is_stopped());
        assert!(shared.try_claim("first"));
        assert!(!shared.try_claim("second"));
        assert_eq!(shared.found().as_deref(), Some("first"));
        assert!(shared.is_stopped());
    }

    #[test]
    fn cancel_keeps_first_reason() {
        let shared = SharedResult::new();
        shared.cancel(CancelReason::TimedOut);
        shared.cancel(CancelReason::Interrupted);
        assert_eq!(shared.cancelled(), Some(CancelReason::TimedOut));
        assert!(shared.is_stopped());
        assert!(shared.found().is_none());
    }
}
