//! CPU worker running the generate-and-test loop.

use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, info, warn};

use crate::crypto::KeyGenerator;
use crate::error::GeneratorError;
use crate::matcher::Pattern;

use super::{Match, SharedState};

/// How a worker's loop ended.
#[derive(Debug)]
pub enum WorkerExit {
    /// This worker found a match. `claimed` is true if it was the one
    /// that stopped the run.
    Matched { claimed: bool },
    /// The stop flag was observed at a batch boundary.
    Stopped,
    /// The keypair capability failed; only this worker is affected.
    Failed(GeneratorError),
}

/// A CPU worker that generates and tests keypairs.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// The prefix to match against
    pattern: Pattern,
    /// Candidates between synchronization points
    batch_size: u64,
    /// Keypair capability
    generator: Arc<dyn KeyGenerator>,
    /// Channel to hand matches to the coordinator
    result_tx: Sender<Match>,
    /// Run-wide counters and stop flag
    state: Arc<SharedState>,
}

impl CpuWorker {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        pattern: Pattern,
        batch_size: u32,
        generator: Arc<dyn KeyGenerator>,
        result_tx: Sender<Match>,
        state: Arc<SharedState>,
    ) -> Self {
        Self {
            id,
            pattern,
            batch_size: u64::from(batch_size.max(1)),
            generator,
            result_tx,
            state,
        }
    }

    /// Runs the worker loop until a match is found, the run is stopped, or
    /// generation fails.
    pub fn run(&self) -> WorkerExit {
        debug!(worker = self.id, batch_size = self.batch_size, "worker started");

        let exit = self.search();
        match &exit {
            WorkerExit::Matched { claimed } => {
                debug!(worker = self.id, claimed, "worker exiting after match")
            }
            WorkerExit::Stopped => debug!(worker = self.id, "worker stopped"),
            WorkerExit::Failed(e) => warn!(worker = self.id, error = %e, "worker failed"),
        }
        exit
    }

    fn search(&self) -> WorkerExit {
        loop {
            // Stop latency is bounded by one batch
            if self.state.is_stopped() {
                return WorkerExit::Stopped;
            }

            let mut local_attempts = 0u64;
            for _ in 0..self.batch_size {
                let (public_key, private_key) = match self.generator.generate() {
                    Ok(pair) => pair,
                    Err(e) => {
                        self.state.increment_attempts(local_attempts);
                        return WorkerExit::Failed(e);
                    }
                };
                local_attempts += 1;

                if self.pattern.matches(&public_key).is_match() {
                    self.state.increment_attempts(local_attempts);
                    let claimed = self.state.try_claim_match();
                    info!(worker = self.id, address = %public_key, claimed, "found match");

                    // A match stays valid even if another worker claimed first
                    let found = Match {
                        public_key,
                        private_key,
                        worker_id: self.id,
                    };
                    if self.result_tx.send(found).is_err() {
                        warn!(worker = self.id, "coordinator gone, match dropped");
                    }
                    return WorkerExit::Matched { claimed };
                }
            }

            self.state.increment_attempts(local_attempts);
        }
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use crossbeam_channel::{bounded, Receiver};

    use super::*;

    /// Yields "Ab12" on call `hit`, misses otherwise, fails after `fail_at`.
    struct Scripted {
        calls: AtomicU64,
        hit: u64,
        fail_at: u64,
    }

    impl KeyGenerator for Scripted {
        fn generate(&self) -> Result<(String, String), GeneratorError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.fail_at {
                return Err(GeneratorError("entropy exhausted".into()));
            }
            if call == self.hit {
                Ok(("Ab12xyz".into(), "secret".into()))
            } else {
                Ok((format!("zz{call}"), "miss".into()))
            }
        }
    }

    fn scripted_worker(
        generator: Arc<Scripted>,
        batch_size: u32,
    ) -> (CpuWorker, Arc<SharedState>, Receiver<Match>) {
        let (tx, rx) = bounded(1);
        let state = Arc::new(SharedState::new());
        let worker = CpuWorker::new(
            0,
            Pattern::new("ab", false),
            batch_size,
            generator,
            tx,
            state.clone(),
        );
        (worker, state, rx)
    }

    #[test]
    fn test_match_flushes_partial_batch() {
        let generator = Arc::new(Scripted {
            calls: AtomicU64::new(0),
            hit: 5,
            fail_at: u64::MAX,
        });
        let (worker, state, rx) = scripted_worker(generator.clone(), 3);

        assert!(matches!(worker.run(), WorkerExit::Matched { claimed: true }));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 5);
        assert_eq!(state.snapshot().total_attempts, 5);
        assert_eq!(rx.try_recv().unwrap().public_key, "Ab12xyz");
    }

    #[test]
    fn test_stopped_before_first_batch() {
        let generator = Arc::new(Scripted {
            calls: AtomicU64::new(0),
            hit: 0,
            fail_at: u64::MAX,
        });
        let (worker, state, _rx) = scripted_worker(generator.clone(), 10);
        state.cancel();

        assert!(matches!(worker.run(), WorkerExit::Stopped));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    /// Claims the run on behalf of a sibling on its first call, then
    /// yields a match on the second.
    struct SiblingClaimsFirst {
        calls: AtomicU64,
        state: Arc<SharedState>,
    }

    impl KeyGenerator for SiblingClaimsFirst {
        fn generate(&self) -> Result<(String, String), GeneratorError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                assert!(self.state.try_claim_match());
                Ok(("zz".into(), "miss".into()))
            } else {
                Ok(("aBcd".into(), "secret".into()))
            }
        }
    }

    #[test]
    fn test_match_after_sibling_claim_is_still_reported() {
        let state = Arc::new(SharedState::new());
        let generator = Arc::new(SiblingClaimsFirst {
            calls: AtomicU64::new(0),
            state: state.clone(),
        });
        let (tx, rx) = bounded(1);
        let worker = CpuWorker::new(
            1,
            Pattern::new("ab", false),
            10,
            generator,
            tx,
            state.clone(),
        );

        assert!(matches!(worker.run(), WorkerExit::Matched { claimed: false }));
        let found = rx.try_recv().unwrap();
        assert_eq!(found.public_key, "aBcd");
        assert_eq!(found.worker_id, worker.id());
        assert_eq!(state.snapshot().found_count, 1);
        assert_eq!(state.snapshot().total_attempts, 2);
    }

    #[test]
    fn test_generator_failure_is_reported() {
        let generator = Arc::new(Scripted {
            calls: AtomicU64::new(0),
            hit: 0,
            fail_at: 4,
        });
        let (worker, state, rx) = scripted_worker(generator, 2);

        assert!(matches!(worker.run(), WorkerExit::Failed(_)));
        assert_eq!(state.snapshot().total_attempts, 3);
        assert!(rx.try_recv().is_err());
    }
}
