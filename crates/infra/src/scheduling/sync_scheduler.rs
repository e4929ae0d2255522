//! Fixed-period scheduler driving profile sync batches.
//!
//! Each period boundary starts one batch through [`SyncService::run_batch`].
//! The batch runs inline on the scheduler task, so at most one batch is ever
//! in flight; boundaries that pass while a batch is still running are dropped
//! rather than queued. The first batch starts one full period after
//! [`SyncScheduler::start`].
//!
//! The loop cancels its token whenever it exits, panics included, so anyone
//! waiting on [`SyncScheduler::cancellation_token`] learns that batches have
//! stopped.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use profilesync_core::SyncService;
//! use profilesync_infra::scheduling::{SchedulerConfig, SyncScheduler};
//!
//! # async fn example(service: Arc<SyncService>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut scheduler = SyncScheduler::new(
//!     service,
//!     SchedulerConfig {
//!         interval: Duration::from_secs(15),
//!         shutdown_grace: Duration::from_secs(10),
//!     },
//! );
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use profilesync_core::SyncService;
use profilesync_domain::SyncConfig;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the sync scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Period between batch starts
    pub interval: Duration,
    /// How long `stop` waits for an in-flight batch
    pub shutdown_grace: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(15), shutdown_grace: Duration::from_secs(10) }
    }
}

impl From<&SyncConfig> for SchedulerConfig {
    fn from(config: &SyncConfig) -> Self {
        Self { interval: config.interval(), shutdown_grace: config.shutdown_grace() }
    }
}

/// Periodic driver for [`SyncService`] batches
pub struct SyncScheduler {
    service: Arc<SyncService>,
    config: SchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl SyncScheduler {
    /// Create a new sync scheduler
    pub fn new(service: Arc<SyncService>, config: SchedulerConfig) -> Self {
        Self {
            service,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the scheduler
    ///
    /// Spawns a background task that runs one batch per period.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is already running, or if the interval is
    /// zero or too large to schedule
    #[instrument(skip(self), fields(interval_secs = self.config.interval.as_secs()))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        let interval = self.config.interval;
        if interval.is_zero() {
            return Err(SchedulerError::InvalidSchedule("interval must be non-zero".into()));
        }
        let first_tick = Instant::now().checked_add(interval).ok_or_else(|| {
            SchedulerError::InvalidSchedule(format!(
                "interval of {}s overflows the clock",
                interval.as_secs()
            ))
        })?;

        info!("Starting sync scheduler");

        // Fresh token so the scheduler can be restarted after a stop
        self.cancellation_token = CancellationToken::new();

        let service = Arc::clone(&self.service);
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::sync_loop(service, first_tick, interval, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!("Sync scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully
    ///
    /// Cancels the loop, then waits up to `shutdown_grace` for an in-flight
    /// batch to finish. On timeout the loop task is aborted.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler was never started (or already stopped), if
    /// the grace period elapses, or if the loop task panicked. A loop that
    /// already exited through its token is reaped and reported as stopped.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        let Some(mut handle) = self.task_handle.lock().await.take() else {
            return Err(SchedulerError::NotRunning);
        };

        info!("Stopping sync scheduler");
        self.cancellation_token.cancel();

        let grace = self.config.shutdown_grace;
        match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(())) => {}
            Ok(Err(join_err)) => {
                error!(error = %join_err, "sync loop terminated abnormally");
                return Err(SchedulerError::TaskJoinFailed(join_err.to_string()));
            }
            Err(_) => {
                warn!(grace_secs = grace.as_secs(), "in-flight batch outlived grace period; aborting");
                handle.abort();
                return Err(SchedulerError::Timeout { seconds: grace.as_secs() });
            }
        }

        info!("Sync scheduler stopped");
        Ok(())
    }

    /// Check if scheduler is running
    ///
    /// A scheduler is considered running if it has an active task handle that
    /// hasn't finished.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Token of the current run; cancelling it stops new batches.
    ///
    /// A restart creates a new token, so fetch it after [`Self::start`].
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Background sync loop
    async fn sync_loop(
        service: Arc<SyncService>,
        first_tick: Instant,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        let _cancel_on_exit = cancel.clone().drop_guard();
        let mut ticker = interval_at(first_tick, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Cancellation wins over a tick that is already due
                biased;
                () = cancel.cancelled() => {
                    debug!("Sync loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    debug!("Sync tick");
                    if let Err(err) = service.run_batch().await {
                        error!(error = %err, "Sync batch aborted");
                    }
                }
            }
        }
    }
}

/// Ensure scheduler is stopped when dropped
impl Drop for SyncScheduler {
    fn drop(&mut self) {
        // Best effort: the handle can't be inspected without async, so rely on the token
        if !self.cancellation_token.is_cancelled() && self.is_running() {
            warn!("SyncScheduler dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}
