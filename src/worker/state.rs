//! Counters and stop flag shared by every worker of a run.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// Point-in-time copy of the shared counters, for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Candidates folded in by all workers so far
    pub total_attempts: u64,
    /// Number of successful claims
    pub found_count: u32,
    /// Whether the run has been told to stop
    pub stopped: bool,
}

#[derive(Debug, Default)]
struct Counters {
    total_attempts: u64,
    found_count: u32,
    stop: bool,
}

/// Process-wide search state.
///
/// Every mutation goes through `counters`. `stopped` mirrors `counters.stop`
/// and is only written while the lock is held, so workers can poll it
/// without contending for the lock.
#[derive(Debug, Default)]
pub struct SharedState {
    counters: Mutex<Counters>,
    stopped: AtomicBool,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a worker's local attempt count into the total.
    pub fn increment_attempts(&self, delta: u64) {
        let mut counters = self.counters.lock();
        counters.total_attempts = counters.total_attempts.saturating_add(delta);
    }

    /// Claims the first match of the run.
    ///
    /// Returns `true` for exactly one caller: the one that flips `stop`.
    /// Later callers, and any caller after a cancellation, get `false`.
    pub fn try_claim_match(&self) -> bool {
        let mut counters = self.counters.lock();
        if counters.stop {
            return false;
        }
        counters.stop = true;
        counters.found_count += 1;
        self.stopped.store(true, Ordering::Release);
        true
    }

    /// Sets the stop flag without recording a match.
    pub fn cancel(&self) {
        let mut counters = self.counters.lock();
        counters.stop = true;
        self.stopped.store(true, Ordering::Release);
    }

    /// Non-blocking read of the stop flag.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Reads all three fields under the lock.
    pub fn snapshot(&self) -> Snapshot {
        let counters = self.counters.lock();
        Snapshot {
            total_attempts: counters.total_attempts,
            found_count: counters.found_count,
            stopped: counters.stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_claim_only_once() {
        let state = SharedState::new();
        assert!(state.try_claim_match());
        assert_eq!(state.snapshot().found_count, 1);
        assert!(!state.try_claim_match());
        assert!(!state.try_claim_match());

        let snapshot = state.snapshot();
        assert_eq!(snapshot.found_count, 1);
        assert!(snapshot.stopped);
    }

    #[test]
    fn test_cancel_is_not_a_match() {
        let state = SharedState::new();
        state.cancel();
        assert!(state.is_stopped());
        assert!(!state.try_claim_match());
        assert_eq!(state.snapshot().found_count, 0);
    }

    #[test]
    fn test_is_stopped_is_pure() {
        let state = SharedState::new();
        state.increment_attempts(7);
        let before = state.snapshot();
        for _ in 0..100 {
            assert!(!state.is_stopped());
        }
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_concurrent_claims_single_winner() {
        let state = Arc::new(SharedState::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let state = state.clone();
                thread::spawn(move || state.try_claim_match())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(state.snapshot().found_count, 1);
    }

    #[test]
    fn test_concurrent_increments_sum() {
        let state = Arc::new(SharedState::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        state.increment_attempts(3);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(state.snapshot().total_attempts, 8 * 1000 * 3);
    }
}
