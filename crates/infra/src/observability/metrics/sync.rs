//! Sync engine metrics
//!
//! Tracks batch throughput and per-record outcomes with plain atomics.
//!
//! ## Design
//! - **No locking needed** - simple atomic counters
//! - **Microsecond storage** - batch durations are stored in µs, reporting
//!   helpers convert to ms
//! - `skipped` counts validation failures as well, so it answers "how many
//!   records were not applied"; `failed_validation` breaks out the subset

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use profilesync_core::SyncObserver;
use profilesync_domain::{BatchReport, SyncOutcome, SyncStatus};
use serde::Serialize;

/// Counters for the sync engine, usable as its observer
#[derive(Debug, Default)]
pub struct SyncMetrics {
    /// Records returned by the source across all batches
    pub fetched: AtomicUsize,
    /// Records applied
    pub synced: AtomicUsize,
    /// Records not applied, validation failures included
    pub skipped: AtomicUsize,
    /// Records rejected by the email check
    pub failed_validation: AtomicUsize,
    /// Upserts that failed
    pub persist_errors: AtomicUsize,
    /// Batches aborted by a fetch failure
    pub fetch_errors: AtomicUsize,
    /// Batches that ran to completion
    pub batches: AtomicUsize,
    /// Total time spent in completed batches in microseconds
    pub total_batch_time_micros: AtomicU64,
    /// Duration of the latest completed batch in microseconds
    pub last_batch_time_micros: AtomicU64,
}

/// Point-in-time copy of [`SyncMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SyncMetricsSnapshot {
    pub fetched: usize,
    pub synced: usize,
    pub skipped: usize,
    pub failed_validation: usize,
    pub persist_errors: usize,
    pub fetch_errors: usize,
    pub batches: usize,
    pub avg_batch_time_ms: f64,
    pub last_batch_time_ms: u64,
}

impl SyncMetrics {
    /// Create new SyncMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the average batch duration in milliseconds
    ///
    /// Returns 0.0 if no batch has completed.
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_batch_time_ms(&self) -> f64 {
        let total = self.total_batch_time_micros.load(Ordering::SeqCst);
        let count = self.batches.load(Ordering::SeqCst);

        if count == 0 {
            return 0.0;
        }

        (total as f64 / count as f64) / 1_000.0
    }

    /// Get the latest batch duration in milliseconds
    pub fn last_batch_time_ms(&self) -> u64 {
        self.last_batch_time_micros.load(Ordering::Relaxed) / 1_000
    }

    /// Copy every counter.
    pub fn snapshot(&self) -> SyncMetricsSnapshot {
        SyncMetricsSnapshot {
            fetched: self.fetched.load(Ordering::Relaxed),
            synced: self.synced.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed_validation: self.failed_validation.load(Ordering::Relaxed),
            persist_errors: self.persist_errors.load(Ordering::Relaxed),
            fetch_errors: self.fetch_errors.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::SeqCst),
            avg_batch_time_ms: self.avg_batch_time_ms(),
            last_batch_time_ms: self.last_batch_time_ms(),
        }
    }
}

impl SyncObserver for SyncMetrics {
    fn batch_fetched(&self, count: usize) {
        self.fetched.fetch_add(count, Ordering::Relaxed);
    }

    fn record_outcome(&self, outcome: &SyncOutcome) {
        match outcome.status {
            SyncStatus::Synced => {
                self.synced.fetch_add(1, Ordering::Relaxed);
            }
            SyncStatus::Skipped => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
            }
            SyncStatus::FailedValidation => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
                self.failed_validation.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn persist_failed(&self, _id: &str) {
        self.persist_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn fetch_failed(&self) {
        self.fetch_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn batch_completed(&self, _report: &BatchReport, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);

        // SeqCst for consistency with avg_batch_time_ms
        self.total_batch_time_micros.fetch_add(micros, Ordering::SeqCst);
        self.batches.fetch_add(1, Ordering::SeqCst);

        self.last_batch_time_micros.store(micros, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: SyncStatus) -> SyncOutcome {
        SyncOutcome { id: "u1".into(), status, message: String::new() }
    }

    #[test]
    fn new_metrics_are_zeroed() {
        let metrics = SyncMetrics::new();
        assert_eq!(metrics.snapshot(), SyncMetricsSnapshot::default());
        assert!(metrics.avg_batch_time_ms().abs() < f64::EPSILON);
    }

    #[test]
    fn validation_failures_also_count_as_skipped() {
        let metrics = SyncMetrics::new();
        metrics.record_outcome(&outcome(SyncStatus::Synced));
        metrics.record_outcome(&outcome(SyncStatus::Skipped));
        metrics.record_outcome(&outcome(SyncStatus::FailedValidation));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.synced, 1);
        assert_eq!(snapshot.skipped, 2);
        assert_eq!(snapshot.failed_validation, 1);
    }

    #[test]
    fn batch_durations_are_averaged() {
        let metrics = SyncMetrics::new();
        let report = BatchReport::new(0);

        metrics.batch_completed(&report, Duration::from_millis(10));
        metrics.batch_completed(&report, Duration::from_millis(30));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.batches, 2);
        assert!((snapshot.avg_batch_time_ms - 20.0).abs() < 0.001);
        assert_eq!(snapshot.last_batch_time_ms, 30);
    }

    #[test]
    fn error_counters_are_independent() {
        let metrics = SyncMetrics::new();
        metrics.batch_fetched(4);
        metrics.persist_failed("u1");
        metrics.fetch_failed();
        metrics.fetch_failed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.fetched, 4);
        assert_eq!(snapshot.persist_errors, 1);
        assert_eq!(snapshot.fetch_errors, 2);
    }
}
