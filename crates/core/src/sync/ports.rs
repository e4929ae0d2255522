//! Port interfaces for batch synchronization

use std::time::Duration;

use async_trait::async_trait;
use profilesync_domain::{BatchReport, Profile, Result, SyncOutcome};

/// Source of candidate profiles for one batch.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch the current batch.
    ///
    /// Any error aborts the whole batch; nothing is partially processed.
    async fn fetch_batch(&self) -> Result<Vec<Profile>>;
}

/// Observability hooks for the sync engine.
///
/// Injected as a capability so tests can record events and production can
/// feed counters. Implementations must not block.
pub trait SyncObserver: Send + Sync {
    /// A batch of `count` records was fetched.
    fn batch_fetched(&self, count: usize);

    /// A record reached a persisted outcome.
    fn record_outcome(&self, outcome: &SyncOutcome);

    /// Persisting the record with this id failed.
    fn persist_failed(&self, id: &str);

    /// Fetching a batch failed.
    fn fetch_failed(&self);

    /// All records of a batch completed.
    fn batch_completed(&self, report: &BatchReport, elapsed: Duration);
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SyncObserver for NoopObserver {
    fn batch_fetched(&self, _count: usize) {}

    fn record_outcome(&self, _outcome: &SyncOutcome) {}

    fn persist_failed(&self, _id: &str) {}

    fn fetch_failed(&self) {}

    fn batch_completed(&self, _report: &BatchReport, _elapsed: Duration) {}
}
