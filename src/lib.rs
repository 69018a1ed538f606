//! # sol_vanity
//!
//! Multi-threaded Solana vanity address generator.
//!
//! ## Architecture
//!
//! - `crypto`: Keypair generation and the `KeyGenerator` capability
//! - `matcher`: Prefix matching with a case rule
//! - `worker`: Shared state, workers, rolling stats and the coordinator
//! - `output`: Append-only match log
//! - `config`: Runtime configuration
//! - `error`: Error types

pub mod config;
pub mod crypto;
pub mod error;
pub mod matcher;
pub mod output;
pub mod worker;

pub use config::{Config, SearchConfig};
pub use crypto::{KeyGenerator, Keypair, SolanaGenerator};
pub use error::{ConfigError, GeneratorError, SearchError, SinkError};
pub use matcher::{MatchResult, Pattern};
pub use output::{ResultSink, WalletFile};
pub use worker::{
    Coordinator, LogReporter, Match, Progress, ProgressReporter, RunResult, RunSummary,
    SharedState, Snapshot, StatsAggregator, StopHandle,
};
