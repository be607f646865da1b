//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                  - Home page
//! GET  /health                            - Health check
//!
//! # Catalog (public)
//! GET  /accommodations                    - Accommodation listing
//! GET  /accommodations/{id}               - Accommodation detail
//! GET  /activities                        - Activity listing
//! GET  /activities/{id}                   - Activity detail
//! GET  /cart                              - Cart page
//! GET  /contact                           - Contact page
//! GET  /favorites                         - Favorites list
//! POST /favorites                         - Remove all favorites
//! POST /favorites/{id}                    - Toggle a favorite
//!
//! # Auth
//! GET  /login                             - Login page
//! POST /login                             - Login action
//! GET  /register                          - Register page
//! POST /register                          - Register action
//! POST /logout                            - Logout action
//!
//! # Account (requires sign-in)
//! GET  /account                           - Account overview
//! GET  /account/bookings                  - Booking history
//! GET  /account/profile                   - Profile form
//! POST /account/profile                   - Profile update
//! GET  /checkout                          - Checkout
//! GET  /checkout/confirmation             - Checkout confirmation
//!
//! # Admin (requires the admin role)
//! GET  /admin                             - Dashboard
//! GET  /admin/accommodations              - Accommodation management
//! GET  /admin/accommodations/new          - New accommodation
//! GET  /admin/accommodations/{id}/edit    - Edit accommodation
//! GET  /admin/activities                  - Activity management
//! GET  /admin/activities/new              - New activity
//! GET  /admin/activities/{id}/edit        - Edit activity
//! GET  /admin/bookings                    - All bookings
//! GET  /admin/contacts                    - Contact messages
//!
//! # JSON
//! GET  /api/session                       - In-memory session view
//! GET  /api/favorites                     - Favorites list
//! ```

pub mod account;
pub mod admin;
pub mod api;
pub mod auth;
pub mod catalog;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};
use staybook_core::AccessLevel;

use crate::state::AppState;

/// Path prefixes that need admission, with the access level each requires.
///
/// Handlers under these prefixes take [`RequireAuth`] or [`RequireAdmin`];
/// this table is the lookup used by tooling and by tests that check every
/// protected page redirects.
///
/// [`RequireAuth`]: crate::middleware::RequireAuth
/// [`RequireAdmin`]: crate::middleware::RequireAdmin
pub const PROTECTED_ROUTES: &[(&str, AccessLevel)] = &[
    ("/admin", AccessLevel::Admin),
    ("/account", AccessLevel::Authenticated),
    ("/checkout", AccessLevel::Authenticated),
];

/// Access level needed for `path`, or `None` for a public page.
///
/// Prefixes match whole segments, so `/accountant` is public.
#[must_use]
pub fn access_for_path(path: &str) -> Option<AccessLevel> {
    PROTECTED_ROUTES.iter().find_map(|(prefix, access)| {
        let rest = path.strip_prefix(prefix)?;
        (rest.is_empty() || rest.starts_with('/')).then_some(*access)
    })
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::home))
        .route("/accommodations", get(catalog::accommodations))
        .route("/accommodations/{id}", get(catalog::accommodation))
        .route("/activities", get(catalog::activities))
        .route("/activities/{id}", get(catalog::activity))
        .route("/cart", get(catalog::cart))
        .route("/contact", get(catalog::contact))
        .route(
            "/favorites",
            get(catalog::favorites).post(catalog::clear_favorites),
        )
        .route("/favorites/{id}", post(catalog::toggle_favorite))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/bookings", get(account::bookings))
        .route(
            "/profile",
            get(account::profile_page).post(account::update_profile),
        )
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::checkout))
        .route("/confirmation", get(account::confirmation))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route("/accommodations", get(admin::accommodations))
        .route("/accommodations/new", get(admin::new_accommodation))
        .route("/accommodations/{id}/edit", get(admin::edit_accommodation))
        .route("/activities", get(admin::activities))
        .route("/activities/new", get(admin::new_activity))
        .route("/activities/{id}/edit", get(admin::edit_activity))
        .route("/bookings", get(admin::bookings))
        .route("/contacts", get(admin::contacts))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(api::session))
        .route("/favorites", get(api::favorites))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .merge(auth_routes())
        .nest("/account", account_routes())
        .nest("/checkout", checkout_routes())
        .nest("/admin", admin_routes())
        .nest("/api", api_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        for path in ["/", "/accommodations/7", "/favorites", "/login", "/accountant", "/administrator"] {
            assert_eq!(access_for_path(path), None, "{path}");
        }
    }

    #[test]
    fn test_protected_paths() {
        assert_eq!(access_for_path("/account"), Some(AccessLevel::Authenticated));
        assert_eq!(access_for_path("/account/profile"), Some(AccessLevel::Authenticated));
        assert_eq!(access_for_path("/checkout/confirmation"), Some(AccessLevel::Authenticated));
        assert_eq!(access_for_path("/admin"), Some(AccessLevel::Admin));
        assert_eq!(access_for_path("/admin/activities/3/edit"), Some(AccessLevel::Admin));
    }
}
