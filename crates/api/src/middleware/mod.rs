//! Request-path middleware.
//!
//! - [`auth::AuthUser`] -- extracts the authenticated caller from the
//!   session cookie (the store-backed tier's entry check).
//! - [`gate`] -- the per-request allow/deny/redirect gate for the
//!   store-less tier.

pub mod auth;
pub mod gate;
