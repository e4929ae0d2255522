//! Last-write-wins reconciliation of a single record
//!
//! Every path through [`Reconciler::reconcile`] ends in exactly one upsert,
//! so each attempted record leaves an audit trail:
//!
//! | condition                                   | status              | row attributes |
//! |---------------------------------------------|---------------------|----------------|
//! | invalid email                               | `failed_validation` | incoming       |
//! | status not `active`/`pending`               | `skipped`           | incoming       |
//! | stored `last_updated_at` >= incoming        | `skipped`           | stored (kept)  |
//! | no stored row, or stored is older           | `synced`            | incoming       |
//!
//! The lookup and the upsert for one id run under a per-id lock, so two
//! records sharing an id within a batch cannot interleave.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use profilesync_domain::constants::{REASON_NOT_NEWER, REASON_SYNCED};
use profilesync_domain::{Profile, Result, SyncOutcome, SyncStatus};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::profile::ports::ProfileRepository;
use crate::sync::ports::SyncObserver;
use crate::validation;

/// Decides and persists the outcome for one incoming record.
pub struct Reconciler {
    repository: Arc<dyn ProfileRepository>,
    observer: Arc<dyn SyncObserver>,
    id_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Reconciler {
    pub fn new(repository: Arc<dyn ProfileRepository>, observer: Arc<dyn SyncObserver>) -> Self {
        Self { repository, observer, id_locks: DashMap::new() }
    }

    /// Validate, resolve against the stored row, and persist.
    ///
    /// # Errors
    /// Returns the store's error when the final upsert fails. Lookup errors
    /// are not propagated; they are treated as "no stored row".
    pub async fn reconcile(&self, incoming: Profile) -> Result<SyncOutcome> {
        let id = incoming.id.clone();
        let lock = self.lock_for(&id);

        let result = {
            let _guard = lock.lock().await;
            let (record, status, reason) = self.decide(incoming).await;
            self.persist(record, status, reason).await
        };

        drop(lock);
        self.id_locks.remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    /// Number of ids currently holding a reconcile lock entry.
    pub fn tracked_locks(&self) -> usize {
        self.id_locks.len()
    }

    fn lock_for(&self, id: &str) -> Arc<Mutex<()>> {
        Arc::clone(&self.id_locks.entry(id.to_string()).or_default())
    }

    async fn decide(&self, incoming: Profile) -> (Profile, SyncStatus, &'static str) {
        if let Err(rejection) = validation::validate(&incoming) {
            warn!(id = %incoming.id, reason = rejection.reason, "record rejected by validation");
            return (incoming, rejection.status, rejection.reason);
        }

        let existing = match self.repository.get(&incoming.id).await {
            Ok(found) => found,
            Err(err) => {
                warn!(id = %incoming.id, error = %err, "profile lookup failed; treating as absent");
                None
            }
        };

        match existing {
            Some(stored)
                if compare_freshness(&incoming.last_updated_at, &stored.last_updated_at)
                    != Ordering::Greater =>
            {
                debug!(
                    id = %incoming.id,
                    incoming = %incoming.last_updated_at,
                    stored = %stored.last_updated_at,
                    "record not newer than stored copy"
                );
                (stored, SyncStatus::Skipped, REASON_NOT_NEWER)
            }
            _ => (incoming, SyncStatus::Synced, REASON_SYNCED),
        }
    }

    async fn persist(
        &self,
        record: Profile,
        status: SyncStatus,
        reason: &'static str,
    ) -> Result<SyncOutcome> {
        let record = record.with_outcome(status, reason);

        if let Err(err) = self.repository.upsert(&record).await {
            error!(id = %record.id, status = %status, error = %err, "profile upsert failed");
            self.observer.persist_failed(&record.id);
            return Err(err);
        }

        info!(id = %record.id, status = %status, "profile reconciled");
        let outcome = SyncOutcome { id: record.id, status, message: reason.to_string() };
        self.observer.record_outcome(&outcome);
        Ok(outcome)
    }
}

/// Order two freshness timestamps.
///
/// RFC 3339 values are compared as UTC instants, so offsets and fractional
/// seconds compare correctly. If either side does not parse, the raw strings
/// are compared lexicographically.
pub fn compare_freshness(incoming: &str, stored: &str) -> Ordering {
    match (parse_timestamp(incoming), parse_timestamp(stored)) {
        (Some(incoming), Some(stored)) => incoming.cmp(&stored),
        _ => incoming.cmp(stored),
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value).ok().map(|parsed| parsed.with_timezone(&Utc))
}
