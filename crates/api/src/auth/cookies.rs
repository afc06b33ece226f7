//! Session cookie names and header plumbing.
//!
//! The stateless session token travels in an HTTP cookie. Two variants
//! exist: the plain name for HTTP development and a `__Secure-` prefixed
//! name for production. Only one is ever written (per configuration), but
//! every deny/clear path clears BOTH -- a stale variant left behind by a
//! scheme change must not resurrect a session.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

/// Cookie name used over plain HTTP.
pub const SESSION_COOKIE: &str = "session-token";

/// Cookie name used when `SECURE_COOKIES` is on.
pub const SECURE_SESSION_COOKIE: &str = "__Secure-session-token";

/// Extract the session token from the request's `Cookie` header(s).
///
/// The secure variant wins when both are present.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SECURE_SESSION_COOKIE)
        .or_else(|| cookie_value(headers, SESSION_COOKIE))
}

/// Find a single cookie value by name across all `Cookie` headers.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k.trim() == name).then(|| v.trim().to_string())
        })
        .next()
}

/// Build the `Set-Cookie` value that installs the session token.
///
/// `max_age_secs` matches the token's own expiry so the cookie and the JWT
/// die together.
pub fn build_session_cookie(token: &str, secure: bool, max_age_secs: i64) -> String {
    if secure {
        format!(
            "{SECURE_SESSION_COOKIE}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax; Secure"
        )
    } else {
        format!("{SESSION_COOKIE}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax")
    }
}

/// Append `Set-Cookie` headers that clear both session cookie variants.
pub fn append_clear_cookies(headers: &mut HeaderMap) {
    headers.append(
        SET_COOKIE,
        HeaderValue::from_static(
            "session-token=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
        ),
    );
    headers.append(
        SET_COOKIE,
        HeaderValue::from_static(
            "__Secure-session-token=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax; Secure",
        ),
    );
}
