//! Rolling throughput over a bounded window of attempt samples.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default number of retained samples.
pub const DEFAULT_WINDOW: usize = 10;

/// Cumulative attempt count observed at one reporting tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptSample {
    pub timestamp: Instant,
    pub cumulative_attempts: u64,
}

/// Two-point rate estimator over the last `capacity` ticks.
///
/// Only the coordinator thread records samples, so no locking is needed.
#[derive(Debug)]
pub struct StatsAggregator {
    samples: VecDeque<AttemptSample>,
    capacity: usize,
    report_interval: Duration,
    last_report: Option<Instant>,
}

impl StatsAggregator {
    /// Creates an aggregator retaining at most `capacity` samples and
    /// reporting at most once per `report_interval`.
    pub fn new(capacity: usize, report_interval: Duration) -> Self {
        let capacity = capacity.max(2);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            report_interval,
            last_report: None,
        }
    }

    /// Appends a sample, evicting the oldest once the window is full.
    pub fn record_tick(&mut self, total_attempts: u64, now: Instant) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(AttemptSample {
            timestamp: now,
            cumulative_attempts: total_attempts,
        });
    }

    /// Attempts per second between the oldest and newest retained samples.
    ///
    /// Zero with fewer than two samples or when no time has elapsed.
    pub fn rolling_speed(&self) -> f64 {
        let (Some(oldest), Some(newest)) = (self.samples.front(), self.samples.back()) else {
            return 0.0;
        };
        if self.samples.len() < 2 {
            return 0.0;
        }

        let elapsed = newest.timestamp.saturating_duration_since(oldest.timestamp);
        if elapsed.is_zero() {
            return 0.0;
        }

        let attempts = newest
            .cumulative_attempts
            .saturating_sub(oldest.cumulative_attempts);
        attempts as f64 / elapsed.as_secs_f64()
    }

    /// Whether a new reading may be emitted at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_report {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.report_interval,
        }
    }

    /// Records a sample and returns the updated speed if a report is due.
    pub fn tick(&mut self, total_attempts: u64, now: Instant) -> Option<f64> {
        if !self.is_due(now) {
            return None;
        }
        self.last_report = Some(now);
        self.record_tick(total_attempts, now);
        Some(self.rolling_speed())
    }

    /// Returns the retained samples, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &AttemptSample> {
        self.samples.iter()
    }

    /// Returns the window capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
