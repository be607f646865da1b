//! JSON endpoints for client-side scripts.

use axum::{Json, extract::State};
use serde::Serialize;
use staybook_core::ItemId;

use crate::middleware::CurrentSession;
use crate::models::SessionSnapshot;
use crate::state::AppState;

/// Body of `GET /api/favorites`.
#[derive(Debug, Serialize)]
pub struct FavoritesBody {
    pub favorites: Vec<ItemId>,
}

/// The in-memory session, without the credential.
pub async fn session(CurrentSession(session): CurrentSession) -> Json<SessionSnapshot> {
    Json(session.snapshot())
}

/// The favorites, in the order they were added.
pub async fn favorites(State(state): State<AppState>) -> Json<FavoritesBody> {
    Json(FavoritesBody {
        favorites: state.preferences().favorites(),
    })
}
