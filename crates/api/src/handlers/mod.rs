//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers delegate to the repositories in `scrivia_db` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod auth;
pub mod sessions;
