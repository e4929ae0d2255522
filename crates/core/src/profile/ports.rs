//! Port interfaces for profile persistence
//!
//! These traits define the boundary between the sync engine and the
//! storage implementation.

use async_trait::async_trait;
use profilesync_domain::{Profile, Result};

/// Point lookup and idempotent upsert keyed by profile id.
///
/// Implementations must be safe for concurrent use: the dispatcher calls
/// them from several workers at once.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Get the stored profile, audit fields included.
    async fn get(&self, id: &str) -> Result<Option<Profile>>;

    /// Insert or replace the row for `profile.id`.
    ///
    /// Never fails because a row already exists; leaves exactly one row per
    /// id.
    async fn upsert(&self, profile: &Profile) -> Result<()>;
}
