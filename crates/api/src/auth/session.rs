//! Session token generation and validation
//!
//! Sessions are signed JWTs carried in an HttpOnly cookie. The manager owns
//! all expiry policy; the rest of the system only ever asks "is this token
//! a valid session".

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use metashark_shared::Session;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cookie that carries the session token
pub const SESSION_COOKIE: &str = "metashark_session";

/// Session claims
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// Subject (opaque user identifier)
    sub: String,
    /// Display name
    name: String,
    /// Email
    email: String,
    /// Issued at
    iat: i64,
    /// Expiration
    exp: i64,
    /// Token ID
    jti: String,
}

/// Session manager for token operations
#[derive(Clone)]
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl SessionManager {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    /// Issue a signed token for an authenticated session.
    pub fn issue(&self, session: &Session) -> Result<String, SessionError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.expiry_hours);

        let claims = Claims {
            sub: session.subject.clone(),
            name: session.display_name.clone(),
            email: session.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        // Explicit algorithm prevents algorithm confusion attacks
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Encoding(e.to_string()))
    }

    /// Validate a token and recover the session. Expired or malformed
    /// tokens are indistinguishable to callers.
    pub fn validate(&self, token: &str) -> Result<Session, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 60; // 60 second clock skew tolerance

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| Session {
                subject: data.claims.sub,
                display_name: data.claims.name,
                email: data.claims.email,
            })
            .map_err(|_| SessionError::Invalid)
    }

    /// Session lifetime in seconds, for the cookie Max-Age.
    pub fn expiry_seconds(&self) -> i64 {
        self.expiry_hours * 3600
    }

    /// Set-Cookie value establishing a session.
    pub fn session_cookie(&self, token: &str) -> String {
        format!(
            "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.expiry_seconds()
        )
    }

    /// Set-Cookie value terminating a session.
    pub fn clear_cookie(&self) -> String {
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid or expired session")]
    Invalid,
    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// Extract a cookie value from request headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(axum::http::header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]  // Allow unwrap() in tests for cleaner test code
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn session() -> Session {
        Session {
            subject: "1".to_string(),
            display_name: "Metashark Admin".to_string(),
            email: "admin@metashark.example".to_string(),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let manager = SessionManager::new("test-secret-key-at-least-32-chars!", 24);

        let token = manager.issue(&session()).expect("Failed to issue token");
        let recovered = manager.validate(&token).expect("Invalid token");
        assert_eq!(recovered, session());
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let manager = SessionManager::new("test-secret-key-at-least-32-chars!", 24);
        let other = SessionManager::new("another-secret-key-32-chars-long!!", 24);

        let token = other.issue(&session()).expect("Failed to issue token");
        assert!(matches!(
            manager.validate(&token),
            Err(SessionError::Invalid)
        ));
        assert!(matches!(
            manager.validate("garbage"),
            Err(SessionError::Invalid)
        ));
    }

    #[test]
    fn test_cookie_value_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("locale=es; metashark_session=abc123; other=x"),
        );

        assert_eq!(cookie_value(&headers, SESSION_COOKIE), Some("abc123"));
        assert_eq!(cookie_value(&headers, "locale"), Some("es"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
