//! User session model and DTOs.

use scrivia_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `user_sessions` table -- one row per login.
///
/// Rows are only ever inserted and deleted, never updated in place. The
/// stored `token_hash` is the SHA-256 digest of the per-login session
/// handle; the handle itself lives only in the client's signed token.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// DTO for creating a new session row.
pub struct CreateSession {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
