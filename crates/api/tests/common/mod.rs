// Not every test binary exercises every helper.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;

use scrivia_api::auth::jwt::JwtConfig;
use scrivia_api::auth::password::hash_password;
use scrivia_api::config::ServerConfig;
use scrivia_api::middleware::gate;
use scrivia_api::revocation::RevocationCache;
use scrivia_api::routes;
use scrivia_api::state::AppState;
use scrivia_db::models::user::{CreateUser, User};
use scrivia_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults and a known JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        secure_cookies: false,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            session_expiry_days: 30,
        },
    }
}

/// Build the application router with the given pool and a fresh revocation
/// cache.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_cache(pool, RevocationCache::start())
}

/// Build the application router around an existing revocation cache.
///
/// Lets a test hold the cache and observe/drive same-process revocation.
/// Cloning the returned router shares the same state, which models repeated
/// requests against one server instance.
pub fn build_test_app_with_cache(pool: PgPool, revocations: Arc<RevocationCache>) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
        revocations,
    };

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            gate::gate,
        ))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a GET request, optionally with a `Cookie` header.
pub async fn get(app: Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, cookie, None).await
}

/// Issue a POST request with a JSON body, optionally with a `Cookie` header.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    send(app, Method::POST, uri, cookie, Some(body)).await
}

/// Issue a bodyless POST request, optionally with a `Cookie` header.
pub async fn post(app: Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    send(app, Method::POST, uri, cookie, None).await
}

/// Issue a DELETE request, optionally with a `Cookie` header.
pub async fn delete(app: Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    send(app, Method::DELETE, uri, cookie, None).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Deserialize a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

/// Extract the session cookie pair (`name=value`) from a response's
/// `Set-Cookie` headers, ready to send back in a `Cookie` header.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| {
            v.starts_with("session-token=") || v.starts_with("__Secure-session-token=")
        })
        .filter_map(|v| v.split(';').next())
        // A cleared cookie has an empty value; only a real token counts.
        .find(|pair| !pair.ends_with('='))
        .map(|pair| pair.to_string())
}

/// Whether the response clears both session cookie variants.
pub fn clears_session_cookies(response: &Response<Body>) -> bool {
    let cleared: Vec<_> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.contains("Max-Age=0"))
        .collect();
    cleared.iter().any(|v| v.starts_with("session-token=;"))
        && cleared
            .iter()
            .any(|v| v.starts_with("__Secure-session-token=;"))
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a test user directly in the database and return the user row plus
/// the plaintext password used.
pub async fn create_test_user(pool: &PgPool, email: &str) -> (User, String) {
    let password = "test_password_123!";
    let hashed = hash_password(password).expect("hashing should succeed");
    let input = CreateUser {
        email: email.to_string(),
        password_hash: hashed,
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    (user, password.to_string())
}

/// Log in via the API and return the session cookie pair to send on
/// subsequent requests.
pub async fn login(app: Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response).expect("login must set the session cookie")
}
