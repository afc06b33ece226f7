//! Handlers for the `/auth` resource (login, logout, refresh, validity poll).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use scrivia_core::error::CoreError;
use scrivia_db::models::user::UserInfo;
use scrivia_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::cookies::{append_clear_cookies, build_session_cookie};
use crate::auth::enforcer::establish_session;
use crate::auth::jwt::{issue_session_token, new_session_handle};
use crate::auth::password::verify_password;
use crate::auth::validity::{SessionValidity, StoreValidity};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response. The token itself travels in the
/// session cookie, not the body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserInfo,
    /// Session lifetime in seconds.
    pub expires_in: i64,
}

/// Response body for `GET /auth/session/validate`.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. On success, prunes any prior
/// sessions down to the one fresh row and sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Response> {
    // 1. Find user by email. Unknown email and bad password produce the
    //    same message.
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    // 2. Check if the account is active.
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    // 3. Verify password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    // 4. Mint the session handle and enforce the single-session policy.
    //    Best-effort: a store failure is logged and login proceeds on the
    //    stateless token alone.
    let handle = new_session_handle();
    establish_session(
        &state.pool,
        &state.revocations,
        user.id,
        &handle,
        state.config.jwt.session_expiry_days,
    )
    .await;

    // 5. Issue the stateless token and set the cookie.
    let token = issue_session_token(user.id, &handle, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let expires_in = state.config.jwt.session_expiry_days * 24 * 3600;
    let body = LoginResponse {
        user: UserInfo::from(&user),
        expires_in,
    };

    let mut response = Json(body).into_response();
    response
        .headers_mut()
        .append(SET_COOKIE, session_cookie_header(&state, &token, expires_in)?);
    Ok(response)
}

/// POST /api/v1/auth/logout
///
/// Delete every session row for the caller, kill the presented token on
/// this instance, and clear the cookies. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<Response> {
    SessionRepo::delete_all_for_user(&state.pool, user.user_id).await?;

    // Keyed by token, not identity: the presented token dies immediately on
    // this instance without shadowing an immediate re-login.
    state.revocations.mark_token_revoked(&user.token_id).await;

    let mut response = StatusCode::NO_CONTENT.into_response();
    append_clear_cookies(response.headers_mut());
    Ok(response)
}

/// POST /api/v1/auth/refresh
///
/// Re-issue the stateless token for the same identity with a fresh expiry,
/// preserving the session handle. Deliberately touches neither the session
/// store nor the enforcer: session rows change at credential verification
/// only.
pub async fn refresh(State(state): State<AppState>, user: AuthUser) -> AppResult<Response> {
    let token = issue_session_token(user.user_id, &user.token_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let expires_in = state.config.jwt.session_expiry_days * 24 * 3600;
    let mut response = Json(serde_json::json!({ "expires_in": expires_in })).into_response();
    response
        .headers_mut()
        .append(SET_COOKIE, session_cookie_header(&state, &token, expires_in)?);
    Ok(response)
}

/// GET /api/v1/auth/session/validate
///
/// The authoritative validity check, polled periodically by clients. Always
/// hits the session store; "no session row" is a normal `valid: false`,
/// never an error. A store failure is surfaced as a 500, never as a
/// fabricated verdict.
pub async fn validate_session(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ValidateResponse>> {
    let probe = StoreValidity::new(state.pool.clone());
    let valid = probe.is_live(user.user_id, &user.token_id).await?;

    if !valid {
        // Warm this instance's cache so the gate denies the dead token
        // before the client has even processed the response.
        state.revocations.mark_token_revoked(&user.token_id).await;
    }

    Ok(Json(ValidateResponse { valid }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build the `Set-Cookie` header value for a freshly issued token.
fn session_cookie_header(
    state: &AppState,
    token: &str,
    max_age_secs: i64,
) -> Result<HeaderValue, AppError> {
    let cookie = build_session_cookie(token, state.config.secure_cookies, max_age_secs);
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::InternalError(format!("Cookie encoding error: {e}")))
}
