//! Application context - dependency wiring

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use profilesync_core::{Dispatcher, Reconciler, SyncObserver, SyncService};
use profilesync_domain::Config;
use profilesync_infra::{
    DbManager, HttpProfileSource, SchedulerConfig, SchedulerError, SqliteProfileRepository,
    SyncMetrics, SyncScheduler,
};
use tracing::info;

/// Holds every long-lived component of the daemon
pub struct AppContext {
    pub metrics: Arc<SyncMetrics>,
    pub scheduler: SyncScheduler,
}

impl AppContext {
    /// Open the store, run migrations and wire the sync pipeline.
    ///
    /// # Errors
    /// Fails if the configuration is invalid, the database cannot be opened
    /// or migrated, or the HTTP client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        config.validate().context("invalid configuration")?;

        ensure_parent_dir(Path::new(&config.database.path))?;
        let db = Arc::new(
            DbManager::new(&config.database.path, config.database.pool_size)
                .with_context(|| format!("failed to open database at {}", config.database.path))?,
        );
        db.run_migrations().context("failed to run database migrations")?;
        db.health_check().context("database health check failed")?;

        let metrics = Arc::new(SyncMetrics::new());
        let observer: Arc<dyn SyncObserver> = metrics.clone();

        let repository = Arc::new(SqliteProfileRepository::new(Arc::clone(&db)));
        let reconciler = Arc::new(Reconciler::new(repository, Arc::clone(&observer)));
        let dispatcher = Dispatcher::new(reconciler, config.sync.concurrency)?;
        let source = Arc::new(
            HttpProfileSource::from_config(&config.source).context("failed to build HTTP source")?,
        );

        let service = Arc::new(SyncService::new(source, dispatcher, observer));
        let scheduler = SyncScheduler::new(service, SchedulerConfig::from(&config.sync));

        info!(
            db_path = %config.database.path,
            source_url = %config.source.url,
            interval_secs = config.sync.interval_seconds,
            concurrency = config.sync.concurrency,
            "application context initialised"
        );

        Ok(Self { metrics, scheduler })
    }

    /// Stop the scheduler, waiting for an in-flight batch.
    ///
    /// A scheduler that is not running counts as stopped.
    ///
    /// # Errors
    /// Fails if the sync loop panicked or outlived its grace period.
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        match self.scheduler.stop().await {
            Ok(()) | Err(SchedulerError::NotRunning) => Ok(()),
            Err(err) => Err(anyhow::Error::new(err).context("sync scheduler did not stop cleanly")),
        }
    }
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create database directory {}", parent.display())),
        _ => Ok(()),
    }
}
