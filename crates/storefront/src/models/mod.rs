//! Client-side state models.
//!
//! - [`session`] - In-memory session record and its persisted snapshot
//! - [`favorites`] - Favorited catalog items

pub mod favorites;
pub mod session;

pub use favorites::{FavoritesSet, FavoritesState};
pub use session::{SessionRecord, SessionSnapshot};
