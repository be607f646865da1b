//! Admission commands.
//!
//! These run the same guard the storefront runs, against the same file, so
//! they answer "would this page open right now?".

use std::sync::Arc;

use staybook_core::{AccessLevel, AdmissionDecision};
use staybook_storefront::routes::access_for_path;
use staybook_storefront::services::AdmissionGuard;
use staybook_storefront::storage::KeyValueStore;

/// Evaluate an access level.
pub fn check(store: Arc<dyn KeyValueStore>, access: AccessLevel) -> String {
    describe(AdmissionGuard::new(store).evaluate(access))
}

/// Evaluate the access level a path needs.
pub fn route(store: Arc<dyn KeyValueStore>, path: &str) -> String {
    match access_for_path(path) {
        None => "allow (public page)".to_string(),
        Some(access) => check(store, access),
    }
}

fn describe(decision: AdmissionDecision) -> String {
    match decision.redirect_path() {
        None => "allow".to_string(),
        Some(target) => format!("redirect {target}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use staybook_storefront::storage::{MemoryStore, keys};

    use super::*;

    fn store(token: Option<&str>, snapshot: Option<&str>) -> Arc<dyn KeyValueStore> {
        let store = MemoryStore::new();
        if let Some(token) = token {
            store.set(keys::CREDENTIAL, token).unwrap();
        }
        if let Some(snapshot) = snapshot {
            store.set(keys::SESSION, snapshot).unwrap();
        }
        Arc::new(store)
    }

    #[test]
    fn test_route_outcomes() {
        let guest = r#"{"state":{"user":{"id":1,"email":"g@example.com","role":"guest"},"isAuthenticated":true},"version":0}"#;

        assert_eq!(route(store(None, None), "/favorites"), "allow (public page)");
        assert_eq!(route(store(None, None), "/account"), "redirect /login");
        assert_eq!(route(store(Some("t"), Some(guest)), "/account"), "allow");
        assert_eq!(route(store(Some("t"), Some(guest)), "/admin/bookings"), "redirect /account");
        assert_eq!(route(store(Some("t"), Some("garbage")), "/admin"), "allow");
    }

    #[test]
    fn test_check() {
        assert_eq!(check(store(None, None), AccessLevel::Admin), "redirect /login");
    }
}
