//! Configuration structures
//!
//! Every section falls back to documented defaults, so a partial file (or no
//! file at all) still yields a usable configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE, DEFAULT_LOG_LEVEL, DEFAULT_SHUTDOWN_GRACE_SECS,
    DEFAULT_SOURCE_TIMEOUT_SECS, DEFAULT_SOURCE_URL, DEFAULT_SYNC_CONCURRENCY,
    DEFAULT_SYNC_INTERVAL_SECS, MAX_SHUTDOWN_GRACE_SECS, MAX_SYNC_CONCURRENCY,
    MAX_SYNC_INTERVAL_SECS,
};
use crate::errors::{ProfileSyncError, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub source: SourceConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Profile store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: DEFAULT_DB_PATH.to_string(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

/// Remote source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { url: DEFAULT_SOURCE_URL.to_string(), timeout_seconds: DEFAULT_SOURCE_TIMEOUT_SECS }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Batch scheduling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub interval_seconds: u64,
    /// Maximum number of records reconciled at once
    pub concurrency: usize,
    /// How long shutdown waits for an in-flight batch
    pub shutdown_grace_seconds: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_SYNC_INTERVAL_SECS,
            concurrency: DEFAULT_SYNC_CONCURRENCY,
            shutdown_grace_seconds: DEFAULT_SHUTDOWN_GRACE_SECS,
        }
    }
}

impl SyncConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}

impl Config {
    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    /// Returns `ProfileSyncError::Config` naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(ProfileSyncError::Config("database.path must not be empty".into()));
        }
        if self.database.pool_size == 0 {
            return Err(ProfileSyncError::Config("database.pool_size must be at least 1".into()));
        }
        if self.source.url.trim().is_empty() {
            return Err(ProfileSyncError::Config("source.url must not be empty".into()));
        }
        if self.source.timeout_seconds == 0 {
            return Err(ProfileSyncError::Config(
                "source.timeout_seconds must be at least 1".into(),
            ));
        }
        if !(1..=MAX_SYNC_INTERVAL_SECS).contains(&self.sync.interval_seconds) {
            return Err(ProfileSyncError::Config(format!(
                "sync.interval_seconds must be between 1 and {MAX_SYNC_INTERVAL_SECS}"
            )));
        }
        if !(1..=MAX_SYNC_CONCURRENCY).contains(&self.sync.concurrency) {
            return Err(ProfileSyncError::Config(format!(
                "sync.concurrency must be between 1 and {MAX_SYNC_CONCURRENCY}"
            )));
        }
        if self.sync.shutdown_grace_seconds > MAX_SHUTDOWN_GRACE_SECS {
            return Err(ProfileSyncError::Config(format!(
                "sync.shutdown_grace_seconds must be at most {MAX_SHUTDOWN_GRACE_SECS}"
            )));
        }
        Ok(())
    }
}
