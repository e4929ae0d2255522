//! Domain constants
//!
//! Reason strings are persisted verbatim into `sync_message`, so changing
//! them changes the audit trail.

/// Statuses eligible for synchronization (case-sensitive).
pub const ELIGIBLE_STATUSES: [&str; 2] = ["active", "pending"];

pub const REASON_INVALID_EMAIL: &str = "Invalid email format";
pub const REASON_INELIGIBLE_STATUS: &str = "Status is neither active nor pending";
pub const REASON_NOT_NEWER: &str = "not newer than existing record";
pub const REASON_SYNCED: &str = "successfully synced";

// Defaults for externally supplied configuration
pub const DEFAULT_SOURCE_URL: &str = "http://localhost:8080/users/changes";
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_DB_PATH: &str = "profiles.db";
pub const DEFAULT_DB_POOL_SIZE: u32 = 8;
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 15;
pub const DEFAULT_SYNC_CONCURRENCY: usize = 5;
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Upper bounds accepted by `Config::validate`
pub const MAX_SYNC_CONCURRENCY: usize = 1_024;
pub const MAX_SYNC_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;
pub const MAX_SHUTDOWN_GRACE_SECS: u64 = 60 * 60;
