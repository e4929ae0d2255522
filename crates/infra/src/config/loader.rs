//! Configuration loader
//!
//! Builds a [`Config`] from defaults, an optional file and environment
//! overrides.
//!
//! ## Loading Strategy
//! 1. Load `.env` from the working directory, if present
//! 2. Read the file named by `PROFILESYNC_CONFIG`, or the first file found by
//!    [`probe_config_paths`]; without either, start from defaults
//! 3. Apply environment overrides on top
//!
//! ## Environment Variables
//! - `PROFILESYNC_CONFIG`: Explicit config file path
//! - `PROFILESYNC_DB_PATH`: Database file path
//! - `PROFILESYNC_DB_POOL_SIZE`: Connection pool size
//! - `PROFILESYNC_SOURCE_URL`: Upstream endpoint
//! - `PROFILESYNC_SOURCE_TIMEOUT`: Upstream request timeout in seconds
//! - `PROFILESYNC_SYNC_INTERVAL`: Batch period in seconds
//! - `PROFILESYNC_SYNC_CONCURRENCY`: Records reconciled in parallel
//! - `PROFILESYNC_SHUTDOWN_GRACE`: Seconds to wait for an in-flight batch
//! - `PROFILESYNC_LOG_LEVEL`: Default log filter when `RUST_LOG` is unset
//! - `PROFILESYNC_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./profilesync.toml`, `./profilesync.json`
//! 2. `./config.toml`, `./config.json`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use profilesync_domain::{Config, ProfileSyncError, Result};

const CONFIG_PATH_VAR: &str = "PROFILESYNC_CONFIG";
const PROBED_FILES: [&str; 4] =
    ["profilesync.toml", "profilesync.json", "config.toml", "config.json"];

/// Load configuration with the full layering strategy
///
/// # Errors
/// Returns `ProfileSyncError::Config` if:
/// - `PROFILESYNC_CONFIG` names a missing file
/// - The config file cannot be read or parsed
/// - An environment override has an invalid value
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable .env file"),
    }

    let explicit = std::env::var(CONFIG_PATH_VAR).ok().filter(|value| !value.trim().is_empty());

    let mut config = match explicit.map(PathBuf::from).or_else(probe_config_paths) {
        Some(path) => load_from_file(&path)?,
        None => {
            tracing::debug!("No config file found; using defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Overwrite fields of `config` with any `PROFILESYNC_*` variables that are
/// set.
///
/// # Errors
/// Returns `ProfileSyncError::Config` if a numeric or boolean variable does
/// not parse.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(path) = env_string("PROFILESYNC_DB_PATH") {
        config.database.path = path;
    }
    if let Some(size) = env_parse("PROFILESYNC_DB_POOL_SIZE")? {
        config.database.pool_size = size;
    }
    if let Some(url) = env_string("PROFILESYNC_SOURCE_URL") {
        config.source.url = url;
    }
    if let Some(timeout) = env_parse("PROFILESYNC_SOURCE_TIMEOUT")? {
        config.source.timeout_seconds = timeout;
    }
    if let Some(interval) = env_parse("PROFILESYNC_SYNC_INTERVAL")? {
        config.sync.interval_seconds = interval;
    }
    if let Some(concurrency) = env_parse("PROFILESYNC_SYNC_CONCURRENCY")? {
        config.sync.concurrency = concurrency;
    }
    if let Some(grace) = env_parse("PROFILESYNC_SHUTDOWN_GRACE")? {
        config.sync.shutdown_grace_seconds = grace;
    }
    if let Some(level) = env_string("PROFILESYNC_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = env_bool("PROFILESYNC_LOG_JSON")? {
        config.logging.json = json;
    }

    Ok(())
}

/// Load configuration from a file
///
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ProfileSyncError::Config` if the file is missing, unreadable or
/// not valid for its format.
pub fn load_from_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(ProfileSyncError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| ProfileSyncError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ProfileSyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ProfileSyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ProfileSyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the working directory for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    PROBED_FILES.iter().map(|name| cwd.join(name)).find(|path| path.exists())
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ProfileSyncError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str) -> Result<Option<bool>> {
    env_string(key)
        .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ProfileSyncError::Config(format!(
                "Invalid value for {key}: expected a boolean, got {other:?}"
            ))),
        })
        .transpose()
}
