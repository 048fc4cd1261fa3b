// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Shared HTTP plumbing: liveness route, session guard and the JSON error
//! envelope every route in the service answers with.

use axum::{
    extract::{FromRef, FromRequestParts, State},
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use crate::domain::session::{Session, SessionProvider};

/// `{ "success": false, "message": ... }` with the given status
pub fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    Unauthorized,
    /// The provider itself failed; detail is logged, never returned
    ProviderFailure,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthorized => failure(StatusCode::UNAUTHORIZED, "Unauthorized"),
            AuthRejection::ProviderFailure => {
                failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

/// Resolve the session for a request or reject it
pub async fn require_session(
    provider: &dyn SessionProvider,
    headers: &HeaderMap,
) -> Result<Session, AuthRejection> {
    match provider.get_session(headers).await {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(AuthRejection::Unauthorized),
        Err(e) => {
            error!("Session provider failed: {}", e);
            Err(AuthRejection::ProviderFailure)
        }
    }
}

/// Extractor for routes that require an authenticated session
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    Arc<dyn SessionProvider>: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let provider = Arc::<dyn SessionProvider>::from_ref(state);
        require_session(provider.as_ref(), &parts.headers)
            .await
            .map(AuthSession)
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

struct HealthState {
    start_time: Instant,
}

/// `GET /health`
pub fn health_routes() -> Router {
    let state = Arc::new(HealthState {
        start_time: Instant::now(),
    });

    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<Arc<HealthState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::{SessionError, SessionUser};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct FixedSession(Option<Session>);

    #[async_trait]
    impl SessionProvider for FixedSession {
        async fn get_session(&self, _headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSession;

    #[async_trait]
    impl SessionProvider for BrokenSession {
        async fn get_session(&self, _headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
            Err(SessionError::Backend("store offline".into()))
        }
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = health_routes()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_require_session() {
        let user = Session {
            user: SessionUser {
                id: "u1".into(),
                email: None,
                name: None,
            },
        };
        let headers = HeaderMap::new();

        assert_eq!(
            require_session(&FixedSession(Some(user.clone())), &headers).await,
            Ok(user)
        );
        assert_eq!(
            require_session(&FixedSession(None), &headers).await,
            Err(AuthRejection::Unauthorized)
        );
        assert_eq!(
            require_session(&BrokenSession, &headers).await,
            Err(AuthRejection::ProviderFailure)
        );
    }

    #[test]
    fn test_rejection_statuses() {
        assert_eq!(
            AuthRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::ProviderFailure.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
