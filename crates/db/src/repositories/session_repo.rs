//! Repository for the `user_sessions` table.
//!
//! This table is the sole source of truth for "is this identity logged in".
//! Writers treat a missing row on delete as a non-error: a concurrent
//! revocation from another instance may already have removed it.

use scrivia_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, UserSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token_hash, created_at, expires_at";

/// Provides CRUD operations for user sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by its ID, expired or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions WHERE id = $1");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all non-expired sessions for a user, newest first.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE user_id = $1 AND expires_at > NOW()
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find a user's non-expired session by the hash of its handle.
    ///
    /// This is how "which row is this device's session" is resolved: the
    /// token carries the opaque handle (never the row id), and the row
    /// stores the handle's hash.
    pub async fn find_active_by_hash(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE user_id = $1 AND token_hash = $2 AND expires_at > NOW()"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(user_id)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Whether the user's session with the given handle hash is still live.
    pub async fn has_active_with_hash(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                 SELECT 1 FROM user_sessions
                 WHERE user_id = $1 AND token_hash = $2 AND expires_at > NOW()
             )",
        )
        .bind(user_id)
        .bind(token_hash)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }

    /// Whether any non-expired session exists for the user.
    pub async fn has_active_for_user(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                 SELECT 1 FROM user_sessions
                 WHERE user_id = $1 AND expires_at > NOW()
             )",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }

    /// Delete a single session. Returns `true` if a row was deleted.
    ///
    /// Deleting an already-deleted id is not an error (`false`).
    pub async fn delete_by_id(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every session for a user, including expired ones.
    ///
    /// Returns the count of deleted rows.
    pub async fn delete_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every session for a user except the given one.
    ///
    /// Returns the count of deleted rows.
    pub async fn delete_all_except(
        pool: &PgPool,
        user_id: DbId,
        keep_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1 AND id <> $2")
            .bind(user_id)
            .bind(keep_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete expired sessions across all users. Returns the count deleted.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
