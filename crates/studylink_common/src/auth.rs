// --- File: crates/studylink_common/src/auth.rs ---
//! Bearer-token helpers shared by the HTTP handlers and the WebSocket
//! handshake. Tokens are HS256 JWTs carrying the user id as `sub`.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use studylink_config::AuthConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No token provided")]
    MissingToken,
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Failed to issue token: {0}")]
    Issue(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The subject user id.
    pub sub: String,
    /// Expiration timestamp (unix epoch seconds).
    pub exp: usize,
    /// Issued-at timestamp (unix epoch seconds).
    pub iat: usize,
}

/// Issue a signed bearer token for `user_id` with the configured lifetime.
pub fn issue_token(user_id: &str, auth: &AuthConfig) -> Result<String, AuthError> {
    issue_token_with_ttl(user_id, &auth.jwt_secret, auth.token_ttl_secs)
}

/// Issue a signed bearer token with an explicit lifetime in seconds.
/// A non-positive `ttl_secs` produces an already-expired token; tests use this.
pub fn issue_token_with_ttl(
    user_id: &str,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| AuthError::Issue(e.to_string()))
}

/// Verify a bearer token and return its claims.
///
/// Signature and expiry are checked synchronously; an expired token is
/// reported distinctly from a malformed or badly-signed one.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::Invalid(e.to_string()),
    })
}

/// Extract and verify the caller identity from an `Authorization: Bearer`
/// header, returning the authenticated user id.
pub fn bearer_user_id(headers: &HeaderMap, auth: &AuthConfig) -> Result<String, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;
    verify_token(token, &auth.jwt_secret).map(|claims| claims.sub)
}

/// Handler-side convenience: authenticate or produce the 401 response
/// tuple the handlers return.
pub fn require_user(
    headers: &HeaderMap,
    auth: &AuthConfig,
) -> Result<String, (axum::http::StatusCode, String)> {
    bearer_user_id(headers, auth)
        .map_err(|e| (axum::http::StatusCode::UNAUTHORIZED, e.to_string()))
}
