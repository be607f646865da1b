//! Public catalog pages and favorites actions.
//!
//! Listings come from the booking API in the full product; here they render
//! the page shell only. Favorites are kept by the [`PreferenceStore`].
//!
//! [`PreferenceStore`]: crate::services::PreferenceStore

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect},
};
use staybook_core::ItemId;
use tracing::instrument;
use url::Url;

use super::pages::{NavView, PageTemplate};
use crate::error::Result;
use crate::middleware::CurrentSession;
use crate::models::SessionRecord;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Templates
// ─────────────────────────────────────────────────────────────────────────────

/// Accommodation or activity detail page.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/item.html")]
pub struct ItemTemplate {
    pub title: String,
    pub nav: NavView,
    pub heading: String,
    pub kind: &'static str,
    pub item_id: String,
    pub is_favorite: bool,
}

/// Favorites list page.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/favorites.html")]
pub struct FavoritesTemplate {
    pub title: String,
    pub nav: NavView,
    pub favorites: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pages
// ─────────────────────────────────────────────────────────────────────────────

/// Display the home page.
pub async fn home(CurrentSession(session): CurrentSession) -> impl IntoResponse {
    PageTemplate::new(&session, "Find your next stay")
        .line("Browse accommodations and activities, save favorites and book in a few steps.")
}

/// Display the accommodation listing.
pub async fn accommodations(CurrentSession(session): CurrentSession) -> impl IntoResponse {
    PageTemplate::new(&session, "Accommodations")
}

/// Display the activity listing.
pub async fn activities(CurrentSession(session): CurrentSession) -> impl IntoResponse {
    PageTemplate::new(&session, "Activities")
}

/// Display an accommodation.
#[instrument(skip(state, session))]
pub async fn accommodation(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> impl IntoResponse {
    item_page(&state, &session, "Accommodation", id)
}

/// Display an activity.
#[instrument(skip(state, session))]
pub async fn activity(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> impl IntoResponse {
    item_page(&state, &session, "Activity", id)
}

fn item_page(
    state: &AppState,
    session: &SessionRecord,
    kind: &'static str,
    id: String,
) -> ItemTemplate {
    let is_favorite = state.preferences().is_favorite(&ItemId::new(id.as_str()));

    ItemTemplate {
        title: format!("{kind} {id}"),
        nav: NavView::from(session),
        heading: kind.to_string(),
        kind,
        item_id: id,
        is_favorite,
    }
}

/// Display the cart page.
pub async fn cart(CurrentSession(session): CurrentSession) -> impl IntoResponse {
    PageTemplate::new(&session, "Cart").line("Your cart is empty.")
}

/// Display the contact page.
pub async fn contact(CurrentSession(session): CurrentSession) -> impl IntoResponse {
    PageTemplate::new(&session, "Contact us")
}

/// Display the favorites list.
pub async fn favorites(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> impl IntoResponse {
    FavoritesTemplate {
        title: "Favorites".to_string(),
        nav: NavView::from(&session),
        favorites: state
            .preferences()
            .favorites()
            .into_iter()
            .map(|id| id.to_string())
            .collect(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────────────────────────────────────

/// Toggle an item in the favorites and go back to the page it came from.
#[instrument(skip(state, headers))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let now_favorite = state.preferences().toggle_favorite(ItemId::new(id))?;
    tracing::debug!(now_favorite, "Favorite toggled");

    Ok(Redirect::to(&back_path(&headers)))
}

/// Remove every favorite.
#[instrument(skip(state))]
pub async fn clear_favorites(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.preferences().clear_favorites()?;
    Ok(Redirect::to("/favorites"))
}

/// Path of the referring page, or `/favorites` when it is missing.
///
/// Only the path and query are kept so the redirect stays on this site.
fn back_path(headers: &HeaderMap) -> String {
    let base = Url::parse("http://localhost/").ok();

    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| Url::options().base_url(base.as_ref()).parse(referer).ok())
        .map_or_else(
            || "/favorites".to_string(),
            |url| match url.query() {
                Some(query) => format!("{}?{query}", url.path()),
                None => url.path().to_string(),
            },
        )
}
