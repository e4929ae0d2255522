//! Sync service - one fetch-and-reconcile batch

use std::sync::Arc;
use std::time::Instant;

use profilesync_domain::{BatchReport, Result};
use tracing::{error, info};

use super::dispatcher::Dispatcher;
use super::ports::{ProfileSource, SyncObserver};

/// Runs a single batch: fetch from the source, then dispatch every record
pub struct SyncService {
    source: Arc<dyn ProfileSource>,
    dispatcher: Dispatcher,
    observer: Arc<dyn SyncObserver>,
}

impl SyncService {
    /// Create a new sync service
    pub fn new(
        source: Arc<dyn ProfileSource>,
        dispatcher: Dispatcher,
        observer: Arc<dyn SyncObserver>,
    ) -> Self {
        Self { source, dispatcher, observer }
    }

    /// Fetch one batch and reconcile all of it.
    ///
    /// # Errors
    /// Returns the source's error when the fetch fails. No record is
    /// processed in that case.
    pub async fn run_batch(&self) -> Result<BatchReport> {
        let started = Instant::now();

        let batch = match self.source.fetch_batch().await {
            Ok(batch) => batch,
            Err(err) => {
                error!(error = %err, kind = err.label(), "failed to fetch profile batch");
                self.observer.fetch_failed();
                return Err(err);
            }
        };

        info!(count = batch.len(), "fetched profile batch");
        self.observer.batch_fetched(batch.len());

        let report = self.dispatcher.dispatch(batch).await;
        let elapsed = started.elapsed();
        self.observer.batch_completed(&report, elapsed);

        info!(
            total = report.total,
            synced = report.synced,
            skipped = report.skipped,
            failed_validation = report.failed_validation,
            errors = report.errors,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "batch completed"
        );

        Ok(report)
    }
}
