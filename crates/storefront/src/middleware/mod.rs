//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Route admission is not a layer: each protected handler pulls in a
//! [`RequireAuth`] or [`RequireAdmin`] extractor.

pub mod auth;
pub mod request_id;

pub use auth::{AdmissionRejection, CurrentSession, RequireAdmin, RequireAuth};
pub use request_id::request_id_middleware;
