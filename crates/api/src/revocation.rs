//! Process-local negative cache of revoked sessions.
//!
//! Maps a token id or an identity to the moment it was revoked, so the
//! request gate can short-circuit obviously-dead sessions without a store
//! read. The cache is strictly per-instance and best-effort: an entry here
//! means "known revoked on this process"; absence means nothing. Cross-
//! process termination propagates through the authoritative poll endpoint,
//! never through this cache.
//!
//! The cache owns its sweep lifecycle: construction spawns the sweep task,
//! [`RevocationCache::shutdown`] stops it. Entries older than the retention
//! window are inert for [`RevocationCache::is_revoked`] even before the
//! sweep physically removes them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use scrivia_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// How long a revocation entry stays meaningful.
const RETENTION_HOURS: i64 = 24;

/// How often the sweep task purges aged-out entries.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Key for a single revocation entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RevocationKey {
    /// A specific token id (`jti` claim).
    Token(String),
    /// Every token belonging to an identity.
    Identity(DbId),
}

/// Per-process revocation cache with a background sweep.
///
/// Designed to be wrapped in `Arc` and injected via application state, so
/// the per-instance map could be replaced by a shared cache without
/// touching callers.
pub struct RevocationCache {
    entries: RwLock<HashMap<RevocationKey, Timestamp>>,
    retention: chrono::Duration,
    sweep_cancel: CancellationToken,
}

impl RevocationCache {
    /// Create the cache and spawn its sweep task.
    pub fn start() -> Arc<Self> {
        Self::start_with_retention(chrono::Duration::hours(RETENTION_HOURS))
    }

    /// Create the cache with a custom retention window (tests).
    pub fn start_with_retention(retention: chrono::Duration) -> Arc<Self> {
        let cache = Arc::new(Self {
            entries: RwLock::new(HashMap::new()),
            retention,
            sweep_cancel: CancellationToken::new(),
        });

        let sweep_handle = Arc::downgrade(&cache);
        let cancel = cache.sweep_cancel.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            interval.tick().await; // skip the immediate first tick
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("Revocation sweep stopping");
                        break;
                    }
                    _ = interval.tick() => {
                        let Some(cache) = sweep_handle.upgrade() else { break };
                        let purged = cache.purge_expired().await;
                        if purged > 0 {
                            tracing::debug!(purged, "Revocation sweep: purged aged-out entries");
                        }
                    }
                }
            }
        });

        cache
    }

    /// Stop the sweep task. Called during graceful shutdown.
    pub fn shutdown(&self) {
        self.sweep_cancel.cancel();
    }

    /// Mark every session belonging to an identity as revoked, as of now.
    pub async fn mark_identity_revoked(&self, user_id: DbId) {
        self.entries
            .write()
            .await
            .insert(RevocationKey::Identity(user_id), Utc::now());
    }

    /// Mark a single token id as revoked, as of now.
    pub async fn mark_token_revoked(&self, token_id: &str) {
        self.entries
            .write()
            .await
            .insert(RevocationKey::Token(token_id.to_string()), Utc::now());
    }

    /// Remove an identity-keyed entry. A fresh login must not be shadowed
    /// by a stale forced-logout.
    pub async fn clear_identity(&self, user_id: DbId) {
        self.entries
            .write()
            .await
            .remove(&RevocationKey::Identity(user_id));
    }

    /// Whether either key is known-revoked within the retention window.
    ///
    /// Absence of an entry means "not known to be revoked on this process",
    /// never "definitely valid". Never an error.
    pub async fn is_revoked(&self, token_id: Option<&str>, identity: Option<DbId>) -> bool {
        let cutoff = Utc::now() - self.retention;
        let entries = self.entries.read().await;

        let live = |key: &RevocationKey| entries.get(key).is_some_and(|at| *at > cutoff);

        if let Some(jti) = token_id {
            if live(&RevocationKey::Token(jti.to_string())) {
                return true;
            }
        }
        if let Some(user_id) = identity {
            if live(&RevocationKey::Identity(user_id)) {
                return true;
            }
        }
        false
    }

    /// Drop entries older than the retention window. Returns the count purged.
    pub async fn purge_expired(&self) -> usize {
        let cutoff = Utc::now() - self.retention;
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, at| *at > cutoff);
        before - entries.len()
    }

    /// Number of entries currently held (including aged-out, pre-sweep ones).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
