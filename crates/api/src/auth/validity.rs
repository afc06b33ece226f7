//! The capability seam between the two request-handling tiers.
//!
//! Both tiers answer the same question -- "may this identity's session
//! still be live?" -- but with different data access. The gate tier holds
//! only the process-local revocation cache; the authoritative tier holds
//! the session store. Encoding the split as two implementations of one
//! trait keeps either side from silently assuming the other's capabilities.

use std::sync::Arc;

use async_trait::async_trait;
use scrivia_core::types::DbId;
use scrivia_db::repositories::SessionRepo;
use scrivia_db::DbPool;

use crate::auth::jwt::hash_session_handle;
use crate::revocation::RevocationCache;

/// Failure modes of a validity probe.
#[derive(Debug, thiserror::Error)]
pub enum ValidityError {
    /// The session store could not be reached. Must surface as an explicit
    /// failure, never as a silent "valid" or "invalid".
    #[error("session store unavailable: {0}")]
    Store(#[from] sqlx::Error),
}

/// Answers whether a session may still be live, given the identity and the
/// opaque session handle from the caller's token.
#[async_trait]
pub trait SessionValidity: Send + Sync {
    async fn is_live(&self, identity: DbId, session_handle: &str) -> Result<bool, ValidityError>;
}

/// Cache-only probe for the gate tier.
///
/// Never performs I/O and never errors. `true` means "not known to be
/// revoked on this process" -- a best-effort answer, not ground truth.
pub struct CachedValidity {
    cache: Arc<RevocationCache>,
}

impl CachedValidity {
    pub fn new(cache: Arc<RevocationCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl SessionValidity for CachedValidity {
    async fn is_live(&self, identity: DbId, session_handle: &str) -> Result<bool, ValidityError> {
        Ok(!self
            .cache
            .is_revoked(Some(session_handle), Some(identity))
            .await)
    }
}

/// Store-backed probe for the authoritative tier.
///
/// Always hits the session store; a non-expired row matching the handle's
/// hash is the ground truth. This is the only path that can observe a
/// revocation performed on another instance -- including the enforcer on a
/// second device deleting this token's row.
pub struct StoreValidity {
    pool: DbPool,
}

impl StoreValidity {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionValidity for StoreValidity {
    async fn is_live(&self, identity: DbId, session_handle: &str) -> Result<bool, ValidityError> {
        let token_hash = hash_session_handle(session_handle);
        Ok(SessionRepo::has_active_with_hash(&self.pool, identity, &token_hash).await?)
    }
}
