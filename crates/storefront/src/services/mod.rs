//! Client-side services.
//!
//! # Services
//!
//! - [`session`] - Session store (credential + profile, persisted snapshot)
//! - [`preferences`] - Favorites store
//! - [`guard`] - Route admission guard
//!
//! The session store and the guard share one durable store but never talk
//! to each other: the store writes, the guard reads.

pub mod guard;
pub mod preferences;
pub mod session;

pub use guard::AdmissionGuard;
pub use preferences::PreferenceStore;
pub use session::SessionStore;
