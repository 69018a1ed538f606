//! Run coordination: worker lifecycle, match relay and progress reporting.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use tracing::{error, info, warn};

use crate::config::SearchConfig;
use crate::crypto::KeyGenerator;
use crate::error::SearchError;
use crate::matcher::Pattern;
use crate::output::ResultSink;

use super::cpu::{CpuWorker, WorkerExit};
use super::state::{SharedState, Snapshot};
use super::stats::StatsAggregator;

/// How often the coordinator wakes to sample progress while waiting.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A keypair whose address starts with the requested prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// The wallet address (base58)
    pub public_key: String,
    /// The private key text as produced by the generator
    pub private_key: String,
    /// The ID of the worker that found this match
    pub worker_id: usize,
}

/// Terminal outcome of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    /// A worker's claim stopped the run. Carries the first match the
    /// coordinator received.
    Found(Match),
    /// Stopped from outside before any claim. Matches found while the
    /// workers wound down are still saved.
    Cancelled,
}

/// Everything known about a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub result: RunResult,
    /// Counters after every worker exited
    pub snapshot: Snapshot,
    /// Matches received, including ones found during the stop window
    pub matches: usize,
    /// Matches the sink accepted
    pub persisted: usize,
    /// Workers that exited on a generator error or panic
    pub failed_workers: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Average attempts per second over the whole run.
    pub fn average_speed(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.snapshot.total_attempts as f64 / secs
        } else {
            0.0
        }
    }
}

/// One progress reading.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub total_attempts: u64,
    pub found_count: u32,
    /// Attempts per second over the rolling window
    pub rolling_speed: f64,
    pub elapsed: Duration,
}

/// Observer of a running search. Never feeds back into the run.
pub trait ProgressReporter: Send {
    /// Called at most once per report interval.
    fn report(&mut self, progress: &Progress);

    /// Called for every match after the sink has been tried.
    fn match_found(&mut self, _found: &Match, _persisted: bool) {}
}

/// Reports progress as `tracing` events.
#[derive(Debug, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&mut self, progress: &Progress) {
        info!(
            attempts = progress.total_attempts,
            speed = %format!("{:.2}", progress.rolling_speed),
            found = progress.found_count,
            elapsed_secs = progress.elapsed.as_secs(),
            "searching"
        );
    }

    fn match_found(&mut self, found: &Match, persisted: bool) {
        if !persisted {
            // The log is the only place the keys survive
            error!(
                address = %found.public_key,
                private_key = %found.private_key,
                "match not saved, copy these keys"
            );
        }
    }
}

/// Cancels a run from another thread, e.g. a signal handler.
#[derive(Debug, Clone)]
pub struct StopHandle {
    state: Arc<SharedState>,
}

impl StopHandle {
    /// Requests all workers to stop. Not a match claim.
    pub fn cancel(&self) {
        self.state.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.state.is_stopped()
    }

    /// Current counters, for display.
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }
}

/// Owns a run: spawns the workers, relays their matches to the sink,
/// reports progress and joins everything before returning.
pub struct Coordinator {
    config: SearchConfig,
    generator: Arc<dyn KeyGenerator>,
    sink: Box<dyn ResultSink>,
    reporter: Box<dyn ProgressReporter>,
    state: Arc<SharedState>,
}

impl Coordinator {
    /// Creates a coordinator that logs progress through `tracing`.
    pub fn new(
        config: SearchConfig,
        generator: Arc<dyn KeyGenerator>,
        sink: impl ResultSink + 'static,
    ) -> Self {
        Self {
            config,
            generator,
            sink: Box::new(sink),
            reporter: Box::new(LogReporter),
            state: Arc::new(SharedState::new()),
        }
    }

    /// Replaces the progress reporter.
    pub fn with_reporter(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Returns a handle that can cancel the run while `start` blocks.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            state: self.state.clone(),
        }
    }

    /// Runs the search to completion.
    ///
    /// Returns `Found` with the first match received when a worker claimed
    /// the run, or `Cancelled` if the stop handle fired first. Fails only on invalid configuration, thread
    /// spawn failure, or when every worker failed.
    pub fn start(mut self) -> Result<RunSummary, SearchError> {
        self.config.validate()?;

        let pattern = Pattern::new(self.config.prefix.as_str(), self.config.case_sensitive);
        let num_workers = self.config.worker_count as usize;
        info!(
            prefix = pattern.prefix(),
            case_sensitive = pattern.case_sensitive(),
            workers = num_workers,
            batch_size = self.config.batch_size,
            "starting search"
        );

        let start_time = Instant::now();
        // Each worker sends at most one match, so sends never block
        let (result_tx, result_rx) = bounded(num_workers);
        let handles = self.spawn_workers(num_workers, pattern, result_tx)?;

        let mut stats = StatsAggregator::new(self.config.window, self.config.report_interval);
        let mut first: Option<Match> = None;
        let mut matches = 0;
        let mut persisted = 0;

        // Runs until every worker has dropped its sender
        loop {
            match result_rx.recv_timeout(POLL_INTERVAL) {
                Ok(found) => {
                    matches += 1;
                    if self.persist(&found) {
                        persisted += 1;
                    }
                    first.get_or_insert(found);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            let now = Instant::now();
            let snapshot = self.state.snapshot();
            if let Some(rolling_speed) = stats.tick(snapshot.total_attempts, now) {
                self.reporter.report(&Progress {
                    total_attempts: snapshot.total_attempts,
                    found_count: snapshot.found_count,
                    rolling_speed,
                    elapsed: now.duration_since(start_time),
                });
            }
        }

        let failed_workers = join_workers(handles);
        let snapshot = self.state.snapshot();
        let elapsed = start_time.elapsed();

        let result = match first {
            Some(found) if snapshot.found_count > 0 => RunResult::Found(found),
            // Matched inside a batch that was already running when the
            // cancel landed. It is saved, but the run still ends cancelled.
            Some(found) => {
                info!(
                    worker = found.worker_id,
                    address = %found.public_key,
                    "match arrived after cancellation"
                );
                RunResult::Cancelled
            }
            None if failed_workers == num_workers => {
                error!(workers = num_workers, "all workers failed");
                return Err(SearchError::AllWorkersFailed {
                    workers: num_workers,
                });
            }
            None => RunResult::Cancelled,
        };

        info!(
            attempts = snapshot.total_attempts,
            found = snapshot.found_count,
            matches,
            failed_workers,
            elapsed_secs = elapsed.as_secs_f64(),
            "search finished"
        );

        Ok(RunSummary {
            result,
            snapshot,
            matches,
            persisted,
            failed_workers,
            elapsed,
        })
    }

    /// Spawns worker threads. On failure, stops and joins the ones already
    /// running.
    fn spawn_workers(
        &self,
        num_workers: usize,
        pattern: Pattern,
        result_tx: Sender<Match>,
    ) -> Result<Vec<JoinHandle<WorkerExit>>, SearchError> {
        let mut handles = Vec::with_capacity(num_workers);

        for id in 0..num_workers {
            let worker = CpuWorker::new(
                id,
                pattern.clone(),
                self.config.batch_size,
                self.generator.clone(),
                result_tx.clone(),
                self.state.clone(),
            );

            let spawned = thread::Builder::new()
                .name(format!("vanity-worker-{}", id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    self.state.cancel();
                    join_workers(handles);
                    return Err(SearchError::Spawn(e));
                }
            }
        }

        Ok(handles)
    }

    /// Hands a match to the sink. Failures are logged, never fatal.
    fn persist(&mut self, found: &Match) -> bool {
        let saved = match self.sink.persist(found) {
            Ok(()) => {
                info!(worker = found.worker_id, address = %found.public_key, "match saved");
                true
            }
            Err(e) => {
                warn!(worker = found.worker_id, error = %e, "failed to save match");
                false
            }
        };
        self.reporter.match_found(found, saved);
        saved
    }
}

/// Joins every worker and returns how many failed or panicked.
fn join_workers(handles: Vec<JoinHandle<WorkerExit>>) -> usize {
    handles
        .into_iter()
        .map(|handle| match handle.join() {
            Ok(WorkerExit::Failed(_)) => 1,
            Ok(_) => 0,
            Err(_) => {
                error!("worker thread panicked");
                1
            }
        })
        .sum()
}
