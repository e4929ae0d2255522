//! Profile repository implementation using pooled SQLite
//!
//! Persists profiles mirrored from the upstream source together with the
//! audit fields written by the reconciler.

use std::sync::Arc;

use async_trait::async_trait;
use profilesync_core::ProfileRepository;
use profilesync_domain::{Profile, ProfileSyncError, Result as DomainResult, SyncStatus};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;
use tracing::warn;

use super::manager::DbManager;
use super::pool::SqliteConnection;
use crate::errors::InfraError;

/// SQLite-backed implementation of [`ProfileRepository`]
pub struct SqliteProfileRepository {
    db: Arc<DbManager>,
}

impl SqliteProfileRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    async fn get(&self, id: &str) -> DomainResult<Option<Profile>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Profile>> {
            let conn = db.get_connection()?;
            find_profile(&conn, &id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn upsert(&self, profile: &Profile) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let profile = profile.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            upsert_profile(&conn, &profile)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

fn find_profile(conn: &SqliteConnection, id: &str) -> DomainResult<Option<Profile>> {
    conn.query_row(
        "SELECT id, name, email, mobile, status, last_updated_at, sync_status, sync_message
         FROM profiles WHERE id = ?1",
        params![id],
        map_profile_row,
    )
    .optional()
    .map_err(map_sql_error)
}

fn map_profile_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    let id: String = row.get(0)?;
    let sync_status: Option<String> = row.get(6)?;

    // An unknown audit status is reported as absent rather than failing the lookup.
    let sync_status = sync_status.and_then(|raw| match raw.parse::<SyncStatus>() {
        Ok(status) => Some(status),
        Err(err) => {
            warn!(id = %id, error = %err, "unrecognised sync_status in profiles table");
            None
        }
    });

    Ok(Profile {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        mobile: row.get(3)?,
        status: row.get(4)?,
        last_updated_at: row.get(5)?,
        sync_status,
        sync_message: row.get(7)?,
    })
}

/// Insert the profile, or replace every non-key column of the existing row.
fn upsert_profile(conn: &SqliteConnection, profile: &Profile) -> DomainResult<()> {
    conn.execute(
        "INSERT INTO profiles (
            id, name, email, mobile, status, last_updated_at, sync_status, sync_message
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            email = excluded.email,
            mobile = excluded.mobile,
            status = excluded.status,
            last_updated_at = excluded.last_updated_at,
            sync_status = excluded.sync_status,
            sync_message = excluded.sync_message",
        params![
            profile.id,
            profile.name,
            profile.email,
            profile.mobile,
            profile.status,
            profile.last_updated_at,
            profile.sync_status.map(|status| status.as_str()),
            profile.sync_message,
        ],
    )
    .map_err(map_sql_error)?;

    Ok(())
}

// =============================================================================
// Error Mapping
// =============================================================================

fn map_sql_error(err: rusqlite::Error) -> ProfileSyncError {
    ProfileSyncError::from(InfraError::from(err))
}

fn map_join_error(err: task::JoinError) -> ProfileSyncError {
    ProfileSyncError::Internal(format!("Task join error: {err}"))
}

// =============================================================================
// Tests
// =============================================================================
