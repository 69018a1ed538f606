//! Parallel search engine.
//!
//! This module provides:
//! - `SharedState`: run-wide counters and the stop flag
//! - `CpuWorker`: the batched generate-and-test loop
//! - `StatsAggregator`: rolling throughput from a bounded sample window
//! - `Coordinator`: worker lifecycle, cancellation and match relay

mod cpu;
mod pool;
mod state;
mod stats;

pub use cpu::{CpuWorker, WorkerExit};
pub use pool::{
    Coordinator, LogReporter, Match, Progress, ProgressReporter, RunResult, RunSummary,
    StopHandle,
};
pub use state::{SharedState, Snapshot};
pub use stats::{AttemptSample, StatsAggregator, DEFAULT_WINDOW};
