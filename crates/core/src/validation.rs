//! Record validation
//!
//! Pure checks run before reconciliation. Email is checked first; the first
//! failing check decides the outcome and the remaining checks are skipped.

use once_cell::sync::Lazy;
use profilesync_domain::constants::{
    ELIGIBLE_STATUSES, REASON_INELIGIBLE_STATUS, REASON_INVALID_EMAIL,
};
use profilesync_domain::{Profile, SyncStatus};
use regex::Regex;

/// `local@domain.tld` with an ASCII local part and an alphabetic TLD of at
/// least two letters.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$")
        .expect("EMAIL_REGEX pattern is valid and well-formed")
});

/// Why a record was rejected, and the audit status that rejection maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub status: SyncStatus,
    pub reason: &'static str,
}

/// Email shape check. Rejects with `failed_validation`.
pub fn check_email(email: &str) -> Result<(), Rejection> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(Rejection { status: SyncStatus::FailedValidation, reason: REASON_INVALID_EMAIL })
    }
}

/// Status membership check (case-sensitive). Rejects with `skipped`.
pub fn check_status(status: &str) -> Result<(), Rejection> {
    if ELIGIBLE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(Rejection { status: SyncStatus::Skipped, reason: REASON_INELIGIBLE_STATUS })
    }
}

/// Run all checks in order, stopping at the first rejection.
pub fn validate(profile: &Profile) -> Result<(), Rejection> {
    check_email(&profile.email)?;
    check_status(&profile.status)
}
