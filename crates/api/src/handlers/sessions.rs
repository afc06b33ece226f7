//! Handlers for the `/sessions` resource: list active sessions, revoke one,
//! revoke all but the current one.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use scrivia_core::error::CoreError;
use scrivia_core::types::{DbId, Timestamp};
use scrivia_db::repositories::SessionRepo;
use serde::Serialize;

use crate::auth::cookies::append_clear_cookies;
use crate::auth::jwt::hash_session_handle;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One entry in the session list. Exposes no token material.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub id: DbId,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    /// Whether this row is the caller's own session, resolved by matching
    /// the caller's session handle against the row's stored hash.
    pub is_current: bool,
}

/// Response body for `DELETE /sessions/{id}`.
#[derive(Debug, Serialize)]
pub struct RevokeResponse {
    pub success: bool,
    /// True when the caller revoked their own current session and was
    /// signed out as part of the same operation.
    pub signed_out: bool,
}

/// Response body for `POST /sessions/revoke-others`.
#[derive(Debug, Serialize)]
pub struct RevokeOthersResponse {
    pub success: bool,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/sessions
///
/// List the caller's non-expired sessions, newest first, marking the row
/// belonging to the caller's own token.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<SessionInfo>>>> {
    let rows = SessionRepo::list_active_for_user(&state.pool, user.user_id).await?;

    let caller_hash = hash_session_handle(&user.token_id);
    let data = rows
        .iter()
        .map(|s| SessionInfo {
            id: s.id,
            created_at: s.created_at,
            expires_at: s.expires_at,
            is_current: s.token_hash == caller_hash,
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/sessions/{id}
///
/// Revoke a single session owned by the caller. A row that does not exist
/// and a row owned by someone else produce the same 404 -- nothing leaks
/// about other identities' sessions. Deleting an already-deleted row is a
/// clean 404, never corruption.
pub async fn revoke_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let session = match SessionRepo::find_by_id(&state.pool, id).await? {
        Some(s) if s.user_id == user.user_id => s,
        _ => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Session",
                id,
            }))
        }
    };

    let was_current = session.token_hash == hash_session_handle(&user.token_id);

    let deleted = SessionRepo::delete_by_id(&state.pool, session.id).await?;
    if !deleted {
        // A concurrent revoke from another instance got here first.
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id,
        }));
    }

    state.revocations.mark_identity_revoked(user.user_id).await;

    let mut response = Json(RevokeResponse {
        success: true,
        signed_out: was_current,
    })
    .into_response();
    if was_current {
        append_clear_cookies(response.headers_mut());
    }
    Ok(response)
}

/// POST /api/v1/sessions/revoke-others
///
/// Delete every session row except the caller's current one; the caller
/// stays signed in. No cache entry is written here -- other devices are
/// evicted when their own poll finds the row gone, within one poll
/// interval.
pub async fn revoke_others(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<RevokeOthersResponse>> {
    let caller_hash = hash_session_handle(&user.token_id);
    let current = SessionRepo::find_active_by_hash(&state.pool, user.user_id, &caller_hash).await?;

    let removed = match current {
        Some(cur) => SessionRepo::delete_all_except(&state.pool, user.user_id, cur.id).await?,
        // The caller's own row is already gone (revoked elsewhere); clear
        // the remainder and let the caller's own next poll sign them out.
        None => SessionRepo::delete_all_for_user(&state.pool, user.user_id).await?,
    };

    Ok(Json(RevokeOthersResponse {
        success: true,
        message: format!("Signed out {removed} other session(s)"),
    }))
}
