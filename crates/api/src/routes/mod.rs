pub mod auth;
pub mod health;
pub mod sessions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login              login (public)
/// /auth/logout             logout (requires auth)
/// /auth/refresh            token refresh (requires auth)
/// /auth/session/validate   authoritative validity poll (requires auth)
///
/// /sessions                list active sessions
/// /sessions/{id}           revoke one session (DELETE)
/// /sessions/revoke-others  revoke all but the current session (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, logout, refresh, validity poll).
        .nest("/auth", auth::router())
        // Session management (list / revoke).
        .nest("/sessions", sessions::router())
}
