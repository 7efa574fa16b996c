//! Wire types for the hosted user directory.
//!
//! The backing service keeps one account in two stores: the identity store
//! (sign-in email, display name) and the profile store (username, email,
//! role, status). The admin console reads the profile store and mirrors
//! edits into both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access level of a directory account.
///
/// The wire format is a lowercase string; values this build does not know
/// deserialize as [`Role::Unknown`] instead of failing the whole fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Moderator,
    #[default]
    User,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Every selectable role, in the order pickers show them.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Moderator, Role::User];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Moderator => write!(f, "moderator"),
            Role::User => write!(f, "user"),
            Role::Unknown => write!(f, "unknown"),
        }
    }
}

/// Lifecycle state of a directory account.
///
/// Older profile rows predate this column; missing values deserialize as
/// [`AccountStatus::Active`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Suspended,
}

impl AccountStatus {
    /// Every filterable status, in the order pickers show them.
    pub const ALL: [AccountStatus; 2] = [AccountStatus::Active, AccountStatus::Suspended];
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "active"),
            AccountStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// One account row from the profile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Opaque store-assigned identifier. Never edited.
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

/// The editable subset of a [`UserRecord`], as held by the edit modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDraft {
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl EditDraft {
    /// Seed a draft from the record being edited.
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            username: record.username.clone(),
            email: record.email.clone(),
            role: record.role,
        }
    }
}

/// Body for `PUT /auth/v1/admin/users/{id}` (identity store).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUpdateRequest {
    pub email: String,
    pub display_name: String,
}

/// Body for `PUT /rest/v1/profiles/{id}` (profile store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record_json(role: &str) -> String {
        format!(
            r#"{{"id":"u_1","username":"alice","email":"alice@example.com","role":"{role}","createdAt":"2026-03-01T12:00:00Z"}}"#
        )
    }

    #[test]
    fn test_user_record_deserializes_camel_case() {
        let record: UserRecord = serde_json::from_str(&record_json("admin")).unwrap();
        assert_eq!(record.id, "u_1");
        assert_eq!(record.username, "alice");
        assert_eq!(record.role, Role::Admin);
        assert_eq!(
            record.created_at,
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_status_defaults_to_active() {
        let record: UserRecord = serde_json::from_str(&record_json("user")).unwrap();
        assert_eq!(record.status, AccountStatus::Active);
    }

    #[test]
    fn test_unrecognized_role_maps_to_unknown() {
        let record: UserRecord = serde_json::from_str(&record_json("superuser")).unwrap();
        assert_eq!(record.role, Role::Unknown);
    }

    #[test]
    fn test_role_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Moderator).unwrap(), r#""moderator""#);
        assert_eq!(
            serde_json::from_str::<Role>(r#""moderator""#).unwrap(),
            Role::Moderator
        );
    }

    #[test]
    fn test_identity_request_uses_display_name_key() {
        let body = IdentityUpdateRequest {
            email: "alice@example.com".to_string(),
            display_name: "alice".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""displayName":"alice""#));
    }

    #[test]
    fn test_edit_draft_from_record() {
        let record: UserRecord = serde_json::from_str(&record_json("moderator")).unwrap();
        let draft = EditDraft::from_record(&record);
        assert_eq!(draft.username, "alice");
        assert_eq!(draft.email, "alice@example.com");
        assert_eq!(draft.role, Role::Moderator);
    }
}
