//! Cookie-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use scrivia_core::error::CoreError;
use scrivia_core::types::DbId;

use crate::auth::cookies::session_token_from_headers;
use crate::auth::jwt::decode_session_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from the session cookie.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
///
/// A token whose identity is the `null` sentinel rejects exactly like a
/// missing token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The identity's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The opaque session handle (from `claims.jti`): the token-keyed
    /// revocation handle, and the link to the session row via its hash.
    pub token_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token_from_headers(&parts.headers).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Missing session cookie".into()))
        })?;

        let claims = decode_session_token(&token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

        let user_id = claims.sub.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

        Ok(AuthUser {
            user_id,
            token_id: claims.jti,
        })
    }
}
