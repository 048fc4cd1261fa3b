// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! JWT Session Provider
//!
//! Verifies HS256-signed session tokens issued by the web frontend. The token
//! is read from the `Authorization: Bearer` header, falling back to the
//! `hive.session-token` cookie.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Implements the `SessionProvider` port

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::hive_config::{resolve_secret, AuthConfig};
use crate::domain::session::{Session, SessionError, SessionProvider, SessionUser};

pub const SESSION_COOKIE: &str = "hive.session-token";

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User identifier
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

pub struct JwtSessionProvider {
    key: DecodingKey,
    validation: Validation,
}

impl JwtSessionProvider {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, SessionError> {
        let secret = resolve_secret(&config.session_secret)
            .map_err(|e| SessionError::Configuration(e.to_string()))?
            .ok_or_else(|| SessionError::Configuration("auth.session_secret is not set".into()))?;

        if secret.is_empty() {
            return Err(SessionError::Configuration("auth.session_secret is empty".into()));
        }

        Ok(Self::new(secret.as_bytes()))
    }
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        let Some(token) = extract_token(headers) else {
            return Ok(None);
        };

        match decode::<SessionClaims>(token.as_str(), &self.key, &self.validation) {
            Ok(data) => Ok(Some(Session {
                user: SessionUser {
                    id: data.claims.sub,
                    email: data.claims.email,
                    name: data.claims.name,
                },
            })),
            Err(e) => {
                debug!("Rejected session token: {}", e);
                Ok(None)
            }
        }
    }
}

/// Session provider that never authenticates anyone.
///
/// Used when no session secret is configured so that authenticated routes
/// stay closed instead of open.
pub struct DenyAllSessionProvider;

#[async_trait]
impl SessionProvider for DenyAllSessionProvider {
    async fn get_session(&self, _headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        Ok(None)
    }
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"test-session-secret";

    fn token(secret: &[u8], exp_offset_secs: i64) -> String {
        let claims = SessionClaims {
            sub: "user-1".to_string(),
            email: Some("dev@example.com".to_string()),
            name: None,
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_valid_bearer_token() {
        let provider = JwtSessionProvider::new(SECRET);
        let session = provider
            .get_session(&bearer(&token(SECRET, 3600)))
            .await
            .unwrap()
            .expect("session");

        assert_eq!(session.user.id, "user-1");
        assert_eq!(session.user.email.as_deref(), Some("dev@example.com"));
    }

    #[tokio::test]
    async fn test_cookie_token() {
        let provider = JwtSessionProvider::new(SECRET);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, token(SECRET, 3600)))
                .unwrap(),
        );

        assert!(provider.get_session(&headers).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rejects_missing_forged_and_expired_tokens() {
        let provider = JwtSessionProvider::new(SECRET);

        assert!(provider.get_session(&HeaderMap::new()).await.unwrap().is_none());
        assert!(provider
            .get_session(&bearer(&token(b"other-secret", 3600)))
            .await
            .unwrap()
            .is_none());
        assert!(provider
            .get_session(&bearer(&token(SECRET, -3600)))
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_from_config_requires_secret() {
        assert!(JwtSessionProvider::from_config(&AuthConfig::default()).is_err());
        assert!(JwtSessionProvider::from_config(&AuthConfig {
            session_secret: Some("s3cret".to_string()),
        })
        .is_ok());
    }
}
