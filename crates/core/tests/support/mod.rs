//! Shared test helpers for `profilesync-core` integration tests.
//!
//! In-memory mocks for the core ports plus a few record fixtures, so the
//! pipeline tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod observer;
pub mod repositories;

use profilesync_domain::Profile;

/// A valid, eligible record with the given id and timestamp.
pub fn profile(id: &str, last_updated_at: &str) -> Profile {
    Profile {
        id: id.to_string(),
        name: format!("User {id}"),
        email: format!("{id}@example.com"),
        mobile: "+1-555-0100".to_string(),
        status: "active".to_string(),
        last_updated_at: last_updated_at.to_string(),
        ..Profile::default()
    }
}
