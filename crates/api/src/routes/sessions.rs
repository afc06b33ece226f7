//! Route definitions for the `/sessions` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions` (all require auth).
///
/// ```text
/// GET    /                -> list active sessions
/// DELETE /{id}            -> revoke one session
/// POST   /revoke-others   -> revoke all but the current session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sessions::list))
        .route("/{id}", delete(sessions::revoke_one))
        .route("/revoke-others", post(sessions::revoke_others))
}
