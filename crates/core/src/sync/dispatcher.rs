//! Bounded-concurrency fan-out of a batch over the [`Reconciler`]
//!
//! A fixed pool of `min(C, N)` workers pulls records from a bounded queue of
//! the same capacity. Each worker reconciles one record at a time, so no more than C
//! records are ever in flight. Draining the `JoinSet` is the completion
//! barrier: [`Dispatcher::dispatch`] returns only after every worker exits.

use std::sync::Arc;

use profilesync_domain::{BatchReport, Profile, ProfileSyncError, Result};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use super::reconciler::Reconciler;

type SharedQueue = Arc<Mutex<mpsc::Receiver<Profile>>>;

/// Runs the reconciler over whole batches with a concurrency cap.
pub struct Dispatcher {
    reconciler: Arc<Reconciler>,
    concurrency: usize,
}

impl Dispatcher {
    /// # Errors
    /// Returns [`ProfileSyncError::InvalidInput`] when `concurrency` is 0.
    pub fn new(reconciler: Arc<Reconciler>, concurrency: usize) -> Result<Self> {
        if concurrency == 0 {
            return Err(ProfileSyncError::InvalidInput(
                "dispatcher concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self { reconciler, concurrency })
    }

    /// Reconcile every record in `batch` and wait for all of them.
    ///
    /// Per-record failures are logged and counted in
    /// [`BatchReport::errors`]; they never stop sibling records.
    pub async fn dispatch(&self, batch: Vec<Profile>) -> BatchReport {
        let mut report = BatchReport::new(batch.len());
        if batch.is_empty() {
            return report;
        }

        let worker_count = self.concurrency.min(batch.len());
        let (tx, rx) = mpsc::channel::<Profile>(worker_count);
        let queue: SharedQueue = Arc::new(Mutex::new(rx));

        let mut workers: JoinSet<BatchReport> = JoinSet::new();
        for worker_id in 0..worker_count {
            let reconciler = Arc::clone(&self.reconciler);
            let queue = Arc::clone(&queue);
            workers.spawn(run_worker(worker_id, reconciler, queue));
        }
        debug!(records = batch.len(), workers = worker_count, "batch dispatched");

        for profile in batch {
            if tx.send(profile).await.is_err() {
                // Every worker has exited; whatever is left is unaccounted for.
                error!("dispatch queue closed before batch was fully queued");
                break;
            }
        }
        drop(tx);

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(partial) => report.absorb(&partial),
                Err(join_err) => error!(error = %join_err, "dispatch worker panicked"),
            }
        }

        let unaccounted = report.total.saturating_sub(report.processed());
        for _ in 0..unaccounted {
            report.record_error();
        }

        report
    }
}

async fn run_worker(worker_id: usize, reconciler: Arc<Reconciler>, queue: SharedQueue) -> BatchReport {
    let mut partial = BatchReport::default();

    loop {
        let next = queue.lock().await.recv().await;
        let Some(profile) = next else { break };

        let id = profile.id.clone();
        match reconciler.reconcile(profile).await {
            Ok(outcome) => partial.record(outcome.status),
            Err(err) => {
                warn!(worker_id, id = %id, error = %err, "record failed to reconcile");
                partial.record_error();
            }
        }
    }

    partial
}
