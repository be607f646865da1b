//! Route admission guard.
//!
//! Runs before a protected page is built and answers with an
//! [`AdmissionDecision`]. The guard reads durable storage directly and
//! never the in-memory session store, so a logout is seen by the very next
//! navigation even if already-rendered pages still show the old profile.
//!
//! # Decision table
//!
//! | credential | snapshot              | `Authenticated` | `Admin`             |
//! |------------|-----------------------|-----------------|---------------------|
//! | absent     | anything              | login           | login               |
//! | present    | absent / unparsable   | allow           | allow (fail-open)   |
//! | present    | role `"admin"`        | allow           | allow               |
//! | present    | any other role / none | allow           | account             |
//!
//! The fail-open row is long-standing behavior that the admin area relies
//! on when no snapshot has been written yet. It is logged at `warn` every
//! time it is taken.

use std::sync::Arc;

use serde::Deserialize;
use staybook_core::{AccessLevel, AdmissionDecision};

use crate::storage::{KeyValueStore, keys};

/// Role value that grants the admin area.
const ADMIN_ROLE: &str = "admin";

/// The session envelope as the guard reads it: only `state` matters, so a
/// `version` of any shape never decides whether the snapshot parses.
#[derive(Debug, Deserialize)]
struct SnapshotEnvelope {
    state: SnapshotClaims,
}

/// Loose view of the session snapshot: only the role claim matters, and
/// any JSON shape for `user` is accepted.
#[derive(Debug, Deserialize)]
struct SnapshotClaims {
    #[serde(default)]
    user: Option<serde_json::Value>,
}

impl SnapshotClaims {
    fn role(&self) -> Option<&str> {
        self.user.as_ref()?.get("role")?.as_str()
    }
}

/// Decide admission from the raw durable entries.
///
/// `credential` is the value under the credential key and `snapshot` the
/// value under the session key, both as read from storage. A blank
/// credential counts as absent.
#[must_use]
pub fn decide(
    credential: Option<&str>,
    snapshot: Option<&str>,
    access: AccessLevel,
) -> AdmissionDecision {
    if credential.is_none_or(|token| token.trim().is_empty()) {
        return AdmissionDecision::RedirectToLogin;
    }

    let claims = snapshot.and_then(|raw| serde_json::from_str::<SnapshotEnvelope>(raw).ok());

    let Some(SnapshotEnvelope { state: claims }) = claims else {
        if access.requires_admin() {
            tracing::warn!("No parsable session snapshot; admitting to admin route without role check");
        }
        return AdmissionDecision::Allow;
    };

    if access.requires_admin() && claims.role() != Some(ADMIN_ROLE) {
        return AdmissionDecision::RedirectToAccount;
    }

    AdmissionDecision::Allow
}

/// Admission guard bound to a durable store.
#[derive(Clone)]
pub struct AdmissionGuard {
    store: Arc<dyn KeyValueStore>,
}

impl AdmissionGuard {
    /// Create a guard reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Evaluate admission for a route requiring `access`.
    ///
    /// Reads both entries fresh on every call. Storage errors are treated
    /// as absent entries.
    #[must_use]
    pub fn evaluate(&self, access: AccessLevel) -> AdmissionDecision {
        let credential = self.read(keys::CREDENTIAL);
        let snapshot = self.read(keys::SESSION);

        let decision = decide(credential.as_deref(), snapshot.as_deref(), access);
        tracing::debug!(?access, ?decision, "Admission evaluated");
        decision
    }

    fn read(&self, key: &str) -> Option<String> {
        self.store.get(key).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Guard could not read storage");
            None
        })
    }
}

impl std::fmt::Debug for AdmissionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use staybook_core::{Credential, Email, Role, UserId, UserProfile};

    use super::*;
    use crate::services::SessionStore;
    use crate::storage::{MemoryStore, StorageError};

    const BOTH: [AccessLevel; 2] = [AccessLevel::Authenticated, AccessLevel::Admin];

    fn snapshot_with_role(role: &str) -> String {
        json!({
            "state": {
                "user": {"id": 1, "email": "a@example.com", "role": role},
                "isAuthenticated": true,
            },
            "version": 0,
        })
        .to_string()
    }

    #[test]
    fn test_no_credential_always_redirects_to_login() {
        let snapshots = [
            None,
            Some(snapshot_with_role("admin")),
            Some(snapshot_with_role("guest")),
            Some("garbage".to_string()),
        ];

        for access in BOTH {
            for snapshot in &snapshots {
                assert_eq!(
                    decide(None, snapshot.as_deref(), access),
                    AdmissionDecision::RedirectToLogin
                );
            }
        }
    }

    #[test]
    fn test_blank_credential_counts_as_absent() {
        let admin = snapshot_with_role("admin");
        assert_eq!(
            decide(Some(""), Some(&admin), AccessLevel::Admin),
            AdmissionDecision::RedirectToLogin
        );
    }

    #[test]
    fn test_admin_role_is_admitted() {
        let admin = snapshot_with_role("admin");
        for access in BOTH {
            assert_eq!(
                decide(Some("tok"), Some(&admin), access),
                AdmissionDecision::Allow
            );
        }
    }

    #[test]
    fn test_non_admin_roles_redirect_to_account() {
        for role in ["guest", "staff", "Admin", "superuser", ""] {
            let snapshot = snapshot_with_role(role);
            assert_eq!(
                decide(Some("tok"), Some(&snapshot), AccessLevel::Admin),
                AdmissionDecision::RedirectToAccount,
                "role {role:?}"
            );
            assert_eq!(
                decide(Some("tok"), Some(&snapshot), AccessLevel::Authenticated),
                AdmissionDecision::Allow
            );
        }
    }

    #[test]
    fn test_missing_profile_fails_closed_for_admin() {
        let no_user = json!({"state": {"user": null, "isAuthenticated": true}, "version": 0}).to_string();
        let no_role = json!({"state": {"user": {"id": 1}}}).to_string();
        let numeric_role = json!({"state": {"user": {"role": 1}}}).to_string();

        for snapshot in [no_user, no_role, numeric_role] {
            assert_eq!(
                decide(Some("tok"), Some(&snapshot), AccessLevel::Admin),
                AdmissionDecision::RedirectToAccount
            );
        }
    }

    #[test]
    fn test_unparsable_snapshot_fails_open_for_admin() {
        // Current behavior: without a parsable snapshot the role check is skipped.
        let unparsable = [
            None,
            Some("{not json"),
            Some(r#"{"user": {"role": "guest"}}"#),
            Some(r#"{"state": "guest"}"#),
        ];

        for snapshot in unparsable {
            for access in BOTH {
                assert_eq!(
                    decide(Some("tok"), snapshot, access),
                    AdmissionDecision::Allow
                );
            }
        }
    }

    #[test]
    fn test_version_shape_does_not_reach_role_check() {
        let guest = r#"{"user":{"id":1,"email":"g@example.com","role":"guest"},"isAuthenticated":true}"#;
        let admin = r#"{"user":{"id":1,"email":"a@example.com","role":"admin"},"isAuthenticated":true}"#;

        for version in [r#""1""#, "-1", "1.5", "null", "{}"] {
            let snapshot = format!(r#"{{"state":{guest},"version":{version}}}"#);
            assert_eq!(
                decide(Some("tok"), Some(&snapshot), AccessLevel::Admin),
                AdmissionDecision::RedirectToAccount,
                "version {version}"
            );

            let snapshot = format!(r#"{{"state":{admin},"version":{version}}}"#);
            assert_eq!(
                decide(Some("tok"), Some(&snapshot), AccessLevel::Admin),
                AdmissionDecision::Allow,
                "version {version}"
            );
        }

        let unversioned = format!(r#"{{"state":{guest}}}"#);
        assert_eq!(
            decide(Some("tok"), Some(&unversioned), AccessLevel::Admin),
            AdmissionDecision::RedirectToAccount
        );
    }

    #[test]
    fn test_guard_sees_logout_immediately() {
        let kv = Arc::new(MemoryStore::new());
        let session = SessionStore::new(kv.clone());
        let guard = AdmissionGuard::new(kv);

        let admin = UserProfile {
            id: UserId::new(1),
            email: Email::parse("admin@example.com").unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            role: Role::Admin,
            email_verified: true,
            email_verified_at: None,
        };
        session
            .login(Credential::parse("tok").unwrap(), Some(admin))
            .unwrap();
        assert_eq!(guard.evaluate(AccessLevel::Admin), AdmissionDecision::Allow);

        session.logout().unwrap();
        assert_eq!(
            guard.evaluate(AccessLevel::Authenticated),
            AdmissionDecision::RedirectToLogin
        );
        assert_eq!(
            guard.evaluate(AccessLevel::Admin),
            AdmissionDecision::RedirectToLogin
        );
    }

    #[test]
    fn test_guard_reads_storage_not_memory() {
        let kv = Arc::new(MemoryStore::new());
        let guard = AdmissionGuard::new(kv.clone());

        kv.set(keys::CREDENTIAL, "tok").unwrap();
        kv.set(keys::SESSION, &snapshot_with_role("guest")).unwrap();
        assert_eq!(
            guard.evaluate(AccessLevel::Admin),
            AdmissionDecision::RedirectToAccount
        );

        kv.set(keys::SESSION, &snapshot_with_role("admin")).unwrap();
        assert_eq!(guard.evaluate(AccessLevel::Admin), AdmissionDecision::Allow);
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Corrupt("unavailable".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Corrupt("unavailable".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Corrupt("unavailable".to_string()))
        }
    }

    #[test]
    fn test_unreadable_storage_redirects_to_login() {
        let guard = AdmissionGuard::new(Arc::new(BrokenStore));
        for access in BOTH {
            assert_eq!(guard.evaluate(access), AdmissionDecision::RedirectToLogin);
        }
    }
}
