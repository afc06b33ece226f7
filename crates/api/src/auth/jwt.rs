//! Stateless session token generation/validation and session-handle helpers.
//!
//! The session token is an HS256-signed JWT carrying the identity id --
//! deliberately not the session row id, so it stays usable in the request
//! gate, which cannot perform a store lookup. Each login additionally mints
//! an opaque session handle, carried as the `jti` claim and kept stable
//! across token refreshes; only its SHA-256 hash is stored server-side, so
//! a database leak does not compromise active sessions.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use scrivia_core::types::DbId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the identity's internal database id. An explicit `null`
    /// is the invalidated sentinel and must be treated like a missing token.
    pub sub: Option<DbId>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// The opaque session handle (UUID v4), minted at login and preserved
    /// across refreshes. Doubles as the token-keyed revocation handle; its
    /// hash links the token to its session row.
    pub jti: String,
}

/// Configuration for session token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session lifetime in days (default: 30). Applies to both the token
    /// and the durable session row it was issued alongside.
    pub session_expiry_days: i64,
}

/// Default session expiry in days.
const DEFAULT_SESSION_EXPIRY_DAYS: i64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var               | Required | Default |
    /// |-----------------------|----------|---------|
    /// | `JWT_SECRET`          | **yes**  | --      |
    /// | `SESSION_EXPIRY_DAYS` | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let session_expiry_days: i64 = std::env::var("SESSION_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_SESSION_EXPIRY_DAYS.to_string())
            .parse()
            .expect("SESSION_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            session_expiry_days,
        }
    }
}

/// Issue an HS256 session token for the given identity and session handle.
///
/// Login mints a fresh handle; refresh passes the caller's existing one
/// through so the token stays linked to the same session row.
pub fn issue_session_token(
    user_id: DbId,
    session_handle: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.session_expiry_days * 24 * 3600;

    let claims = Claims {
        sub: Some(user_id),
        exp,
        iat: now,
        jti: session_handle.to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically. A token whose `sub`
/// is `null` still decodes successfully; callers must treat it as
/// unauthenticated.
pub fn decode_session_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Mint a cryptographically random session handle for a fresh login.
pub fn new_session_handle() -> String {
    Uuid::new_v4().to_string()
}

/// Compute the SHA-256 hex digest of a session handle, as stored in the
/// session row.
pub fn hash_session_handle(handle: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(handle.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// Helper to build a test config with a known secret.
    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            session_expiry_days: 30,
        }
    }

    #[test]
    fn test_issue_and_decode_session_token() {
        let config = test_config();
        let handle = new_session_handle();
        let token =
            issue_session_token(42, &handle, &config).expect("token generation should succeed");

        let claims = decode_session_token(&token, &config).expect("decode should succeed");
        assert_eq!(claims.sub, Some(42));
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.jti, handle, "the handle travels as jti");
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Manually create an already-expired token.
        // Use a margin well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Some(1),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert_matches!(
            decode_session_token(&token, &config),
            Err(_),
            "expired token must fail validation"
        );
    }

    #[test]
    fn test_null_subject_decodes_as_anonymous() {
        let config = test_config();

        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: None,
            exp: now + 3600,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        // The sentinel token decodes fine; the identity is simply absent.
        let decoded = decode_session_token(&token, &config).expect("decode should succeed");
        assert_eq!(decoded.sub, None);
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = JwtConfig {
            secret: "secret-alpha".to_string(),
            session_expiry_days: 30,
        };
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
            session_expiry_days: 30,
        };

        let token = issue_session_token(1, &new_session_handle(), &config_a)
            .expect("token generation should succeed");

        assert_matches!(
            decode_session_token(&token, &config_b),
            Err(_),
            "token signed with a different secret must fail"
        );
    }

    #[test]
    fn test_session_handle_hash_is_stable() {
        let handle = new_session_handle();

        let hash = hash_session_handle(&handle);
        assert_eq!(
            hash,
            hash_session_handle(&handle),
            "hash of the same handle must be stable"
        );

        // Sanity: the hash should be a 64-char hex string (SHA-256).
        assert_eq!(hash.len(), 64);
        assert_ne!(hash_session_handle(&new_session_handle()), hash);
    }
}
