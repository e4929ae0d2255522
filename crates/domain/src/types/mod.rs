//! Domain types and models

pub mod profile;
pub mod sync;

pub use profile::Profile;
pub use sync::{BatchReport, SyncOutcome, SyncStatus};
