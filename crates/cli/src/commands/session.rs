//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! staybook session login -e guest@example.com -p secret --api-url https://api.example.com
//! staybook session import -t eyJhbGciOi... --profile me.json
//! staybook session update-user --profile me.json
//! staybook session show
//! staybook session logout
//! ```

use std::path::Path;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use staybook_core::{Credential, UserProfile};
use staybook_storefront::api::ApiClient;
use staybook_storefront::services::SessionStore;
use staybook_storefront::storage::KeyValueStore;
use url::Url;

use super::CliError;

/// Sign in through the booking API and store the session.
pub async fn login(
    store: Arc<dyn KeyValueStore>,
    api_url: &Url,
    email: &str,
    password: &SecretString,
) -> Result<String, CliError> {
    let api = ApiClient::new(api_url);
    let auth = api.login(email.trim(), password.expose_secret()).await?;

    let user = match auth.user {
        Some(user) => Some(user),
        None => match api.current_user(&auth.credential).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch profile after sign-in");
                None
            }
        },
    };

    let session = SessionStore::hydrate(store);
    session.login(auth.credential, user)?;
    Ok(describe(&session))
}

/// Store an existing token and optional profile.
pub fn import(
    store: Arc<dyn KeyValueStore>,
    token: &str,
    profile: Option<&Path>,
) -> Result<String, CliError> {
    let credential = Credential::parse(token)?;
    let user = profile.map(read_profile).transpose()?;

    let session = SessionStore::hydrate(store);
    session.login(credential, user)?;
    Ok(describe(&session))
}

/// Sign out.
pub fn logout(store: Arc<dyn KeyValueStore>) -> Result<String, CliError> {
    let session = SessionStore::hydrate(store);
    session.logout()?;
    Ok("Signed out".to_string())
}

/// Describe the stored session.
pub fn show(store: Arc<dyn KeyValueStore>) -> Result<String, CliError> {
    Ok(describe(&SessionStore::hydrate(store)))
}

/// Replace the stored profile.
pub fn update_user(store: Arc<dyn KeyValueStore>, profile: &Path) -> Result<String, CliError> {
    let user = read_profile(profile)?;
    let session = SessionStore::hydrate(store);
    if !session.is_authenticated() {
        tracing::warn!("No stored token; the profile is saved but the session stays signed out");
    }
    session.update_user(user)?;
    Ok(describe(&session))
}

fn describe(session: &SessionStore) -> String {
    if !session.is_authenticated() {
        return "Signed out".to_string();
    }

    match session.user() {
        Some(user) => format!(
            "Signed in as {} <{}> (role: {})",
            user.display_name(),
            user.email,
            user.role
        ),
        None => "Signed in (profile not loaded)".to_string(),
    }
}

fn read_profile(path: &Path) -> Result<UserProfile, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ProfileFile {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| CliError::InvalidProfile {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use staybook_storefront::storage::{FileStore, keys};

    use super::*;

    const PROFILE: &str = r#"{
        "id": 7,
        "email": "host@example.com",
        "first_name": "Ana",
        "last_name": "Silva",
        "role": "admin",
        "email_verified": true
    }"#;

    fn store_in(dir: &tempfile::TempDir) -> Arc<dyn KeyValueStore> {
        Arc::new(FileStore::open(dir.path().join("store.json")).unwrap())
    }

    #[test]
    fn test_import_show_logout() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join("me.json");
        std::fs::write(&profile, PROFILE).unwrap();

        let out = import(store_in(&dir), "tok-1", Some(&profile)).unwrap();
        assert_eq!(out, "Signed in as Ana Silva <host@example.com> (role: admin)");

        let store = store_in(&dir);
        assert_eq!(store.get(keys::CREDENTIAL).unwrap().as_deref(), Some("tok-1"));
        assert_eq!(show(store).unwrap(), out);

        assert_eq!(logout(store_in(&dir)).unwrap(), "Signed out");
        assert_eq!(store_in(&dir).get(keys::CREDENTIAL).unwrap(), None);
    }

    #[test]
    fn test_import_without_profile() {
        let dir = tempfile::tempdir().unwrap();
        let out = import(store_in(&dir), "tok-2", None).unwrap();
        assert_eq!(out, "Signed in (profile not loaded)");
    }

    #[test]
    fn test_import_rejects_blank_token() {
        let dir = tempfile::tempdir().unwrap();
        let err = import(store_in(&dir), "  ", None).unwrap_err();
        assert!(matches!(err, CliError::Credential(_)));
        assert_eq!(show(store_in(&dir)).unwrap(), "Signed out");
    }

    #[test]
    fn test_update_user_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join("bad.json");
        std::fs::write(&profile, "{not json").unwrap();

        let err = update_user(store_in(&dir), &profile).unwrap_err();
        assert!(matches!(err, CliError::InvalidProfile { .. }));

        let err = update_user(store_in(&dir), &dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CliError::ProfileFile { .. }));
    }

    /// Booking API whose sign-in omits the profile and whose profile lookup fails.
    async fn api_without_profile() -> Url {
        use axum::{Json, Router, http::StatusCode, routing::{get, post}};

        let api = Router::new()
            .route(
                "/auth/login",
                post(|| async { Json(serde_json::json!({ "token": "api-token" })) }),
            )
            .route("/auth/profile", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, api).await;
        });

        Url::parse(&format!("http://{addr}/")).unwrap()
    }

    #[tokio::test]
    async fn test_login_survives_failed_profile_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let api_url = api_without_profile().await;
        let password = SecretString::from("correct horse");

        let out = login(store_in(&dir), &api_url, " guest@example.com ", &password)
            .await
            .unwrap();
        assert_eq!(out, "Signed in (profile not loaded)");
        assert_eq!(store_in(&dir).get(keys::CREDENTIAL).unwrap().as_deref(), Some("api-token"));
    }
}
