//! Session-related types.
//!
//! The session lives in two places: the in-memory [`SessionRecord`] owned
//! by the session store (authoritative for rendered pages) and the
//! [`SessionSnapshot`] written to durable storage (authoritative for route
//! admission). The credential is never part of the snapshot; it is stored
//! on its own under [`crate::storage::keys::CREDENTIAL`].

use serde::{Deserialize, Serialize};

use staybook_core::{Credential, UserProfile};

/// In-memory authentication record.
///
/// `is_authenticated()` is derived from the credential, so the record can
/// never claim to be authenticated without one. The profile may be absent
/// while authenticated (not fetched yet).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRecord {
    credential: Option<Credential>,
    user: Option<UserProfile>,
}

impl SessionRecord {
    /// A signed-in record.
    #[must_use]
    pub const fn authenticated(credential: Credential, user: Option<UserProfile>) -> Self {
        Self {
            credential: Some(credential),
            user,
        }
    }

    /// The bearer credential, if signed in.
    #[must_use]
    pub const fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// The user profile, if known.
    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Whether a credential is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Replace the profile, keeping the credential.
    pub fn set_user(&mut self, user: Option<UserProfile>) {
        self.user = user;
    }

    /// The slice of this record that is persisted as a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated(),
        }
    }
}

/// Persisted subset of the session.
///
/// Serialized inside the `{"state": ..., "version": 0}` envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Profile at the time of the last session mutation.
    #[serde(default)]
    pub user: Option<UserProfile>,
    /// Authenticated flag at the time of the last session mutation.
    #[serde(default)]
    pub is_authenticated: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use staybook_core::{Email, Role, UserId};

    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: UserId::new(3),
            email: Email::parse("guest@example.com").unwrap(),
            first_name: "Rui".to_string(),
            last_name: "Costa".to_string(),
            phone: None,
            role: Role::Staff,
            email_verified: true,
            email_verified_at: None,
        }
    }

    #[test]
    fn test_default_record_is_signed_out() {
        let record = SessionRecord::default();
        assert!(!record.is_authenticated());
        assert!(record.credential().is_none());
        assert!(record.user().is_none());
    }

    #[test]
    fn test_authenticated_without_profile() {
        let record = SessionRecord::authenticated(Credential::parse("t").unwrap(), None);
        assert!(record.is_authenticated());
        assert_eq!(record.snapshot(), SessionSnapshot {
            user: None,
            is_authenticated: true,
        });
    }

    #[test]
    fn test_snapshot_wire_format() {
        let record = SessionRecord::authenticated(Credential::parse("t").unwrap(), Some(profile()));
        let value = serde_json::to_value(record.snapshot()).unwrap();

        assert_eq!(value["isAuthenticated"], json!(true));
        assert_eq!(value["user"]["role"], json!("staff"));
        assert!(value.get("credential").is_none());
        assert!(value.get("token").is_none());
    }

    #[test]
    fn test_snapshot_roundtrip_preserves_profile() {
        let snapshot = SessionSnapshot {
            user: Some(profile()),
            is_authenticated: true,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
