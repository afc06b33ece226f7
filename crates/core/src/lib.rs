//! Shared domain primitives for the Scrivia backend.
//!
//! - [`error`] -- the domain error taxonomy used across crates.
//! - [`types`] -- primitive type aliases (`DbId`, `Timestamp`).

pub mod error;
pub mod types;
