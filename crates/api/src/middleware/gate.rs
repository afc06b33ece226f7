//! Per-request gate running in the store-less tier.
//!
//! Wraps the whole router and decides allow/deny/redirect for every inbound
//! request using nothing but the signed session cookie and the process-local
//! revocation cache. It is handed no pool handle, so it cannot perform a
//! durable read even by accident -- which also means its allow decisions are
//! only as fresh as this process's cache. A session revoked on another
//! instance keeps passing here until that device's authoritative poll
//! observes the missing row.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::cookies::{append_clear_cookies, session_token_from_headers};
use crate::auth::jwt::decode_session_token;
use crate::auth::validity::{CachedValidity, SessionValidity};
use crate::state::AppState;

/// Path prefixes that require an authenticated caller (fail-closed).
/// Everything not listed here is public by default (fail-open).
pub const PROTECTED_PREFIXES: &[&str] = &[
    "/dashboard",
    "/account",
    "/billing",
    "/tools",
    "/api/v1/sessions",
];

/// Pages where an unauthenticated user signs in or signs up.
const AUTH_PAGES: &[&str] = &["/login", "/register"];

/// Paths the gate never inspects: static assets, the health endpoint, and
/// the auth API surface (credential verification, refresh, the
/// authoritative poll endpoint -- those run their own checks).
const BYPASS_PREFIXES: &[&str] = &[
    "/assets/",
    "/static/",
    "/favicon.ico",
    "/robots.txt",
    "/health",
    "/api/v1/auth/",
];

/// Where denied requests land.
pub const LOGIN_PATH: &str = "/login";

/// Where already-authenticated visitors of the auth pages land.
pub const LANDING_PATH: &str = "/dashboard";

fn is_bypassed(path: &str) -> bool {
    BYPASS_PREFIXES.iter().any(|p| path.starts_with(p))
}

fn is_auth_page(path: &str) -> bool {
    AUTH_PAGES
        .iter()
        .any(|p| path == *p || path.starts_with(&format!("{p}/")))
}

fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// The gate itself. Installed via `axum::middleware::from_fn_with_state`.
pub async fn gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();

    if is_bypassed(&path) {
        return next.run(req).await;
    }

    let claims = session_token_from_headers(req.headers())
        .and_then(|raw| decode_session_token(&raw, &state.config.jwt).ok());

    // An explicit null identity is the invalidated sentinel: same as no token.
    let identity = claims.as_ref().and_then(|c| c.sub);

    let probe = CachedValidity::new(Arc::clone(&state.revocations));
    let revoked = match (&claims, identity) {
        (Some(c), Some(id)) => !probe.is_live(id, &c.jti).await.unwrap_or(true),
        _ => false,
    };

    if is_auth_page(&path) {
        if revoked {
            // Let the user through to re-authenticate, shedding the dead
            // cookie on the way.
            let mut response = next.run(req).await;
            append_clear_cookies(response.headers_mut());
            return response;
        }
        if identity.is_some() {
            return Redirect::temporary(LANDING_PATH).into_response();
        }
        return next.run(req).await;
    }

    if revoked {
        return deny();
    }
    if identity.is_none() && is_protected(&path) {
        return deny();
    }

    next.run(req).await
}

/// Clear both cookie variants and send the caller to the login page.
fn deny() -> Response {
    let mut response = Redirect::temporary(LOGIN_PATH).into_response();
    append_clear_cookies(response.headers_mut());
    response
}
