use std::sync::Arc;

use crate::config::ServerConfig;
use crate::revocation::RevocationCache;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool. The request gate never touches it.
    pub pool: scrivia_db::DbPool,
    /// Server configuration (token secret, cookie policy, timeouts).
    pub config: Arc<ServerConfig>,
    /// Process-local revocation cache, injected so the backing store can be
    /// swapped without touching callers.
    pub revocations: Arc<RevocationCache>,
}
