//! Mock port implementations for testing
//!
//! Provides in-memory mocks for the profile store and the upstream source,
//! enabling deterministic tests without database or network dependencies.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use profilesync_core::{ProfileRepository, ProfileSource};
use profilesync_domain::{Profile, ProfileSyncError, Result as DomainResult};

/// In-memory mock for `ProfileRepository`.
///
/// Counts upserts per id and tracks how many records are between their
/// lookup and the end of their upsert, which is what the dispatcher's
/// concurrency cap bounds.
#[derive(Default)]
pub struct MockProfileRepository {
    rows: Mutex<HashMap<String, Profile>>,
    writes: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every lookup and upsert.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Seed a stored row.
    pub fn with_row(self, profile: Profile) -> Self {
        self.rows.lock().unwrap().insert(profile.id.clone(), profile);
        self
    }

    pub fn row(&self, id: &str) -> Option<Profile> {
        self.rows.lock().unwrap().get(id).cloned()
    }

    pub fn writes_for(&self, id: &str) -> usize {
        self.writes.lock().unwrap().get(id).copied().unwrap_or(0)
    }

    pub fn total_writes(&self) -> usize {
        self.writes.lock().unwrap().values().sum()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn get(&self, id: &str) -> DomainResult<Option<Profile>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.pause().await;
        Ok(self.row(id))
    }

    async fn upsert(&self, profile: &Profile) -> DomainResult<()> {
        self.pause().await;
        self.rows.lock().unwrap().insert(profile.id.clone(), profile.clone());
        *self.writes.lock().unwrap().entry(profile.id.clone()).or_insert(0) += 1;
        // Rejected records skip the lookup, so only balance a prior increment.
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        Ok(())
    }
}

/// Source that hands out queued batches, then empty ones.
#[derive(Default, Clone)]
pub struct MockProfileSource {
    batches: Arc<Mutex<VecDeque<DomainResult<Vec<Profile>>>>>,
    calls: Arc<AtomicUsize>,
}

impl MockProfileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch(self, batch: Vec<Profile>) -> Self {
        self.batches.lock().unwrap().push_back(Ok(batch));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.batches.lock().unwrap().push_back(Err(ProfileSyncError::Network(message.to_string())));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileSource for MockProfileSource {
    async fn fetch_batch(&self) -> DomainResult<Vec<Profile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}
