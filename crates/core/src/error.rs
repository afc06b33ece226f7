//! Domain-level error taxonomy.
//!
//! `CoreError` is the transport-agnostic error type shared by all crates.
//! The API layer maps each variant to an HTTP status in its own error type;
//! nothing here knows about HTTP.

use crate::types::DbId;

/// Domain errors produced by repositories and domain logic.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup found nothing.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed domain validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but not allowed to do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An unexpected internal failure. The message is for operators, not users.
    #[error("Internal error: {0}")]
    Internal(String),
}
