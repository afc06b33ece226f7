//! Single-active-session enforcement.
//!
//! Runs on every successful credential verification -- never on token
//! refresh -- and leaves at most one session row for the identity.

use chrono::Utc;
use scrivia_core::types::DbId;
use scrivia_db::models::session::CreateSession;
use scrivia_db::repositories::SessionRepo;
use scrivia_db::DbPool;

use crate::auth::jwt::hash_session_handle;
use crate::revocation::RevocationCache;

/// Prune every existing session for the identity (expired rows included,
/// so the table cannot grow unbounded) and create the one new row, keyed by
/// the hash of the login's freshly minted session handle.
///
/// The two writes are separate statements, deliberately not one
/// transaction: two concurrent logins can interleave and briefly leave two
/// rows, and the next login or revoke heals it.
///
/// Store failure is non-fatal: login proceeds on the stateless token alone
/// and the identity simply has no durable row until the next successful
/// login writes one (the poll endpoint reports `valid: false` meanwhile).
pub async fn establish_session(
    pool: &DbPool,
    cache: &RevocationCache,
    user_id: DbId,
    session_handle: &str,
    expiry_days: i64,
) {
    let outcome: Result<(), sqlx::Error> = async {
        SessionRepo::delete_all_for_user(pool, user_id).await?;

        let token_hash = hash_session_handle(session_handle);
        let expires_at = Utc::now() + chrono::Duration::days(expiry_days);
        SessionRepo::create(
            pool,
            &CreateSession {
                user_id,
                token_hash,
                expires_at,
            },
        )
        .await?;
        Ok(())
    }
    .await;

    if let Err(e) = outcome {
        tracing::warn!(
            user_id,
            error = %e,
            "Session bookkeeping failed during login; login continues without a durable row"
        );
    }

    // A fresh login must never be shadowed by a stale forced-logout entry,
    // even when the store write above failed.
    cache.clear_identity(user_id).await;
}
