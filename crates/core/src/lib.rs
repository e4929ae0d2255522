//! # ProfileSync Core
//!
//! Pure sync engine - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the profile store, the upstream source and
//!   observability
//! - The record validator
//! - Reconciliation, bounded-concurrency dispatch and the batch service
//!
//! ## Architecture Principles
//! - Only depends on `profilesync-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod profile;
pub mod sync;
pub mod validation;

// Re-export specific items to avoid ambiguity
pub use profile::ports::ProfileRepository;
pub use sync::ports::{NoopObserver, ProfileSource, SyncObserver};
pub use sync::{Dispatcher, Reconciler, SyncService};
