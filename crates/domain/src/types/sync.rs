//! Reconciliation outcomes and batch bookkeeping

use serde::{Deserialize, Serialize};

use crate::impl_status_conversions;

/// Audit status persisted with every processed record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Incoming record was newer (or new) and has been applied
    Synced,
    /// Ineligible status, or not newer than the stored record
    Skipped,
    /// Email failed the shape check
    FailedValidation,
}

impl_status_conversions!(SyncStatus {
    Synced => "synced",
    Skipped => "skipped",
    FailedValidation => "failed_validation",
});

/// Result of reconciling a single record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub id: String,
    pub status: SyncStatus,
    pub message: String,
}

/// Summary of one dispatched batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Records handed to the dispatcher
    pub total: usize,
    pub synced: usize,
    pub skipped: usize,
    pub failed_validation: usize,
    /// Records whose persistence failed
    pub errors: usize,
}

impl BatchReport {
    /// Empty report for a batch of `total` records.
    pub fn new(total: usize) -> Self {
        Self { total, ..Self::default() }
    }

    /// Count a persisted outcome.
    pub fn record(&mut self, status: SyncStatus) {
        match status {
            SyncStatus::Synced => self.synced += 1,
            SyncStatus::Skipped => self.skipped += 1,
            SyncStatus::FailedValidation => self.failed_validation += 1,
        }
    }

    /// Count a record that could not be persisted.
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Fold another partial report's counters into this one.
    ///
    /// `total` is left untouched; it belongs to whoever created the batch.
    pub fn absorb(&mut self, other: &BatchReport) {
        self.synced += other.synced;
        self.skipped += other.skipped;
        self.failed_validation += other.failed_validation;
        self.errors += other.errors;
    }

    /// Records that reached a terminal state, persisted or not.
    pub fn processed(&self) -> usize {
        self.synced + self.skipped + self.failed_validation + self.errors
    }
}
