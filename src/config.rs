//! Runtime configuration for the vanity address generator.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;
use crate::matcher::Pattern;
use crate::output::DEFAULT_OUTPUT;
use crate::worker::DEFAULT_WINDOW;

/// Upper bound on the worker pool size.
pub const MAX_WORKERS: usize = 64;

/// Candidates per worker between stop checks.
pub const DEFAULT_BATCH_SIZE: u32 = 50_000;

/// Solana Vanity Address Generator
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Desired address prefix (prompted for when omitted)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Case sensitive matching: yes or no (prompted for when omitted)
    #[arg(short = 'c', long)]
    pub case_sensitive: Option<String>,

    /// Number of worker threads (default: CPU count, at most 64)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Keypairs per batch; larger batches sync less but stop later
    #[arg(short = 'b', long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: u32,

    /// File that found wallets are appended to
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "1")]
    pub report_interval: u64,

    /// Number of progress samples in the rolling speed window
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,
}

impl Config {
    /// Returns the number of workers, defaulting to the CPU count.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(default_worker_count)
    }

    /// Builds the run configuration once prefix and case rule are known.
    ///
    /// `prefix` and `case_sensitive` override the CLI values, which lets
    /// the binary fill them in from interactive prompts.
    pub fn search_config(
        &self,
        prefix: &str,
        case_sensitive: &str,
    ) -> Result<SearchConfig, ConfigError> {
        let case_sensitive: bool = case_sensitive.parse::<CaseSensitivity>()?.into();
        let requested = self.worker_count();
        let worker_count =
            u32::try_from(requested).map_err(|_| ConfigError::InvalidWorkerCount {
                requested,
                max: MAX_WORKERS,
            })?;

        let config = SearchConfig {
            prefix: prefix.trim().to_string(),
            case_sensitive,
            batch_size: self.batch_size,
            worker_count,
            report_interval: Duration::from_secs(self.report_interval),
            window: self.window,
        };

        config.validate()?;
        Pattern::new(config.prefix.as_str(), config.case_sensitive).check_alphabet()?;
        Ok(config)
    }
}

/// Returns the CPU count capped at `MAX_WORKERS`.
pub fn default_worker_count() -> usize {
    num_cpus::get().clamp(1, MAX_WORKERS)
}

/// An explicit yes/no answer. Anything else is rejected, never defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

impl FromStr for CaseSensitivity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(CaseSensitivity::Sensitive),
            "no" | "n" | "false" => Ok(CaseSensitivity::Insensitive),
            _ => Err(ConfigError::InvalidCaseSensitivity(s.to_string())),
        }
    }
}

impl From<CaseSensitivity> for bool {
    fn from(value: CaseSensitivity) -> Self {
        value == CaseSensitivity::Sensitive
    }
}

/// Immutable parameters shared by every worker of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub prefix: String,
    pub case_sensitive: bool,
    pub batch_size: u32,
    pub worker_count: u32,
    pub report_interval: Duration,
    pub window: usize,
}

impl SearchConfig {
    /// Creates a config with default batch size, pool size and reporting.
    pub fn new(prefix: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            prefix: prefix.into(),
            case_sensitive,
            batch_size: DEFAULT_BATCH_SIZE,
            worker_count: default_worker_count() as u32,
            report_interval: Duration::from_secs(1),
            window: DEFAULT_WINDOW,
        }
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_workers(mut self, worker_count: u32) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_report_interval(mut self, report_interval: Duration) -> Self {
        self.report_interval = report_interval;
        self
    }

    /// Checks the structural constraints every run relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }

        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }

        let workers = self.worker_count as usize;
        if workers == 0 || workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                requested: workers,
                max: MAX_WORKERS,
            });
        }

        if self.report_interval < Duration::from_secs(1) {
            return Err(ConfigError::InvalidReportInterval);
        }

        if self.window < 2 {
            return Err(ConfigError::InvalidWindow);
        }

        Ok(())
    }
}
