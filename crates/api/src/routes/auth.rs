//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login              -> login (public)
/// POST /logout             -> logout (requires auth)
/// POST /refresh            -> refresh token (requires auth)
/// GET  /session/validate   -> authoritative validity poll (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/refresh", post(auth::refresh))
        .route("/session/validate", get(auth::validate_session))
}
