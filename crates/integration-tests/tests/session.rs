//! Sign-in, profile update and sign-out against a stand-in booking API.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;
use staybook_core::Role;
use staybook_integration_tests::{TestContext, body_text, location, spawn_api};
use staybook_storefront::storage::keys;

#[tokio::test]
async fn test_login_persists_session() {
    let ctx = TestContext::with_api(spawn_api(Role::Admin).await);

    let response = ctx
        .post_form("/login", "email=traveller%40example.com&password=correct+horse")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/account"));

    assert_eq!(ctx.stored(keys::CREDENTIAL).as_deref(), Some("api-token"));
    let snapshot: Value = serde_json::from_str(&ctx.stored(keys::SESSION).unwrap()).unwrap();
    assert_eq!(snapshot["version"], 0);
    assert_eq!(snapshot["state"]["isAuthenticated"], true);
    assert_eq!(snapshot["state"]["user"]["role"], "admin");
    assert!(!snapshot.to_string().contains("api-token"));

    assert_eq!(ctx.get("/admin").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_stays_signed_out() {
    let ctx = TestContext::with_api(spawn_api(Role::Guest).await);

    let response = ctx
        .post_form("/login", "email=traveller%40example.com&password=nope")
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(response).await.contains("Incorrect email or password."));

    assert_eq!(ctx.stored(keys::CREDENTIAL), None);
    assert_eq!(location(&ctx.get("/account").await), Some("/login"));
}

#[tokio::test]
async fn test_malformed_email_never_reaches_api() {
    let ctx = TestContext::new();
    let response = ctx.post_form("/login", "email=not-an-email&password=x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_update_replaces_user() {
    let ctx = TestContext::with_api(spawn_api(Role::Guest).await);
    ctx.sign_in(Role::Guest);

    let response = ctx
        .post_form("/account/profile", "first_name=Nura&last_name=Haddad&phone=")
        .await;
    assert_eq!(location(&response), Some("/account"));

    let user = ctx.state.session().user().unwrap();
    assert_eq!(user.first_name, "Nura");
    assert_eq!(ctx.stored(keys::CREDENTIAL).as_deref(), Some("test-token"));

    let snapshot: Value = serde_json::from_str(&ctx.stored(keys::SESSION).unwrap()).unwrap();
    assert_eq!(snapshot["state"]["user"]["first_name"], "Nura");
}

#[tokio::test]
async fn test_session_survives_restart() {
    let first = TestContext::new();
    first.sign_in(Role::Guest);

    let second = TestContext::over(Arc::clone(&first.store), first.state.config().api_url.clone());
    assert!(second.state.session().is_authenticated());
    assert_eq!(second.state.session().record(), first.state.session().record());

    let body = body_text(second.get("/account").await).await;
    assert!(body.contains("traveller@example.com"));
}

#[tokio::test]
async fn test_session_json_hides_credential() {
    let ctx = TestContext::new();
    ctx.sign_in(Role::Guest);

    let body = body_text(ctx.get("/api/session").await).await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["isAuthenticated"], true);
    assert_eq!(json["user"]["email"], "traveller@example.com");
    assert!(!body.contains("test-token"));

    ctx.post_form("/logout", "").await;
    let json: Value = serde_json::from_str(&body_text(ctx.get("/api/session").await).await).unwrap();
    assert_eq!(json, serde_json::json!({ "user": null, "isAuthenticated": false }));
}
