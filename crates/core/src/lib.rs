//! Staybook Core - Shared domain types.
//!
//! This crate provides the types shared by every Staybook component:
//! - `storefront` - The booking client (catalog, cart, account, admin area)
//! - `cli` - Command-line tools for inspecting and editing the local session
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. Anything that touches the durable store or the remote
//! booking API lives in `staybook-storefront`.
//!
//! # Modules
//!
//! - [`types`] - Credentials, identifiers, user profiles, roles and admission outcomes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
