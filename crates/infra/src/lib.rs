//! # ProfileSync Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - SQLite profile store (r2d2 pool, migrations)
//! - HTTP client and the HTTP profile source
//! - The periodic sync scheduler
//! - Configuration loading
//! - Metrics fed through the sync observer port
//!
//! ## Architecture
//! - Implements traits defined in `profilesync-core`
//! - Depends on `profilesync-domain` and `profilesync-core`
//! - Contains all "impure" code (I/O, timers)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod observability;
pub mod scheduling;
pub mod source;

// Re-export commonly used items
pub use database::{DbManager, SqliteProfileRepository};
pub use errors::InfraError;
pub use http::HttpClient;
pub use observability::{SyncMetrics, SyncMetricsSnapshot};
pub use scheduling::{SchedulerConfig, SchedulerError, SyncScheduler};
pub use source::HttpProfileSource;
