//! Admin-area route handlers.
//!
//! Every handler takes [`RequireAdmin`], which admits only a stored role
//! claim of exactly `admin` (or a snapshot the guard cannot read).

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use super::pages::PageTemplate;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

fn admin_page(state: &AppState, heading: &str) -> PageTemplate {
    PageTemplate::new(&state.session().record(), heading)
}

/// Display the admin dashboard.
pub async fn dashboard(State(state): State<AppState>, RequireAdmin(user): RequireAdmin) -> impl IntoResponse {
    let page = admin_page(&state, "Admin dashboard");
    match user {
        Some(user) => page.line(format!("Signed in as {}.", user.display_name())),
        None => page,
    }
}

/// Display accommodation management.
pub async fn accommodations(State(state): State<AppState>, RequireAdmin(_): RequireAdmin) -> impl IntoResponse {
    admin_page(&state, "Manage accommodations")
}

/// Display the new accommodation form.
pub async fn new_accommodation(State(state): State<AppState>, RequireAdmin(_): RequireAdmin) -> impl IntoResponse {
    admin_page(&state, "New accommodation")
}

/// Display the accommodation edit form.
pub async fn edit_accommodation(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<String>,
) -> impl IntoResponse {
    admin_page(&state, &format!("Edit accommodation {id}"))
}

/// Display activity management.
pub async fn activities(State(state): State<AppState>, RequireAdmin(_): RequireAdmin) -> impl IntoResponse {
    admin_page(&state, "Manage activities")
}

/// Display the new activity form.
pub async fn new_activity(State(state): State<AppState>, RequireAdmin(_): RequireAdmin) -> impl IntoResponse {
    admin_page(&state, "New activity")
}

/// Display the activity edit form.
pub async fn edit_activity(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<String>,
) -> impl IntoResponse {
    admin_page(&state, &format!("Edit activity {id}"))
}

/// Display all bookings.
pub async fn bookings(State(state): State<AppState>, RequireAdmin(_): RequireAdmin) -> impl IntoResponse {
    admin_page(&state, "All bookings")
}

/// Display contact messages.
pub async fn contacts(State(state): State<AppState>, RequireAdmin(_): RequireAdmin) -> impl IntoResponse {
    admin_page(&state, "Contact messages")
}
