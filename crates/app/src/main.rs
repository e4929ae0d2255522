//! profilesync - periodic user profile synchronization daemon
//!
//! Loads configuration, opens the profile store and runs the sync scheduler
//! until interrupted.

mod context;
mod logging;

use anyhow::Context as _;
use context::AppContext;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = profilesync_infra::config::load().context("failed to load configuration")?;
    logging::init_tracing(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "profilesync starting");

    let mut ctx = AppContext::new(&config)?;
    ctx.scheduler.start().await.context("failed to start sync scheduler")?;
    let cancel = ctx.scheduler.cancellation_token();

    tokio::select! {
        result = shutdown_signal() => result?,
        () = cancel.cancelled() => warn!("sync loop exited without a shutdown signal"),
    }

    info!("shutdown requested; waiting for in-flight batch");
    let stopped = ctx.shutdown().await;

    let snapshot = ctx.metrics.snapshot();
    info!(
        metrics = %serde_json::to_string(&snapshot).unwrap_or_default(),
        "profilesync stopped"
    );
    stopped
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.context("failed to listen for ctrl-c")?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await.context("failed to listen for ctrl-c")?;

    Ok(())
}
