//! User profile record
//!
//! A `Profile` is built fresh from every fetched batch. The audit fields are
//! filled in by reconciliation and are never accepted from the wire.

use serde::{Deserialize, Deserializer, Serialize};

use super::sync::SyncStatus;

/// The unit of synchronization.
///
/// Every wire field is optional; an omitted or `null` field decodes as the
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Stable external identifier, primary key for storage
    #[serde(deserialize_with = "nullable_string")]
    pub id: String,
    #[serde(deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(deserialize_with = "nullable_string")]
    pub mobile: String,
    /// Lifecycle status reported by the source (`active`, `pending`, ...)
    #[serde(deserialize_with = "nullable_string")]
    pub status: String,
    /// Freshness timestamp reported by the source
    #[serde(deserialize_with = "nullable_string")]
    pub last_updated_at: String,
    /// Outcome of the most recent sync attempt
    #[serde(skip)]
    pub sync_status: Option<SyncStatus>,
    /// Human-readable reason for `sync_status`
    #[serde(skip)]
    pub sync_message: Option<String>,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Profile {
    /// Stamp the audit fields with the given outcome.
    #[must_use]
    pub fn with_outcome(mut self, status: SyncStatus, message: impl Into<String>) -> Self {
        self.sync_status = Some(status);
        self.sync_message = Some(message.into());
        self
    }

    /// Compare the source-owned attributes, ignoring the audit fields.
    pub fn same_attributes(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.email == other.email
            && self.mobile == other.mobile
            && self.status == other.status
            && self.last_updated_at == other.last_updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_with_missing_fields_as_empty() {
        let profile: Profile =
            serde_json::from_str(r#"{"id":"u1","email":"a@b.co"}"#).expect("decode");

        assert_eq!(profile.id, "u1");
        assert_eq!(profile.email, "a@b.co");
        assert!(profile.name.is_empty());
        assert!(profile.last_updated_at.is_empty());
        assert!(profile.sync_status.is_none());
    }

    #[test]
    fn decodes_null_fields_as_empty() {
        let profile: Profile =
            serde_json::from_str(r#"{"id":"u1","mobile":null,"status":null}"#).expect("decode");

        assert!(profile.mobile.is_empty());
        assert!(profile.status.is_empty());
    }

    #[test]
    fn audit_fields_are_not_read_from_the_wire() {
        let profile: Profile = serde_json::from_str(
            r#"{"id":"u1","sync_status":"synced","sync_message":"forged","extra":1}"#,
        )
        .expect("decode");

        assert!(profile.sync_status.is_none());
        assert!(profile.sync_message.is_none());
    }

    #[test]
    fn with_outcome_sets_audit_fields() {
        let profile = Profile { id: "u9".into(), ..Profile::default() }
            .with_outcome(SyncStatus::Skipped, "not newer than existing record");

        assert_eq!(profile.id, "u9");
        assert_eq!(profile.sync_status, Some(SyncStatus::Skipped));
        assert_eq!(profile.sync_message.as_deref(), Some("not newer than existing record"));
    }

    #[test]
    fn same_attributes_ignores_audit_fields() {
        let base = Profile {
            id: "u1".into(),
            email: "a@b.co".into(),
            last_updated_at: "2024-01-02T00:00:00Z".into(),
            ..Profile::default()
        };
        let stamped = base.clone().with_outcome(SyncStatus::Synced, "successfully synced");

        assert!(base.same_attributes(&stamped));
        assert_ne!(base, stamped);
    }
}
