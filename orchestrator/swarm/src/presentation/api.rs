// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Swarm HTTP routes.
//!
//! | Method | Path | Session | Handler |
//! |--------|------|---------|---------|
//! | POST | `/api/swarm/poll` | no | operator-triggered reconciliation |
//! | GET | `/api/swarm/poll?id=` | yes | read-triggered reconciliation |
//! | POST | `/api/swarm` | yes | register a pending swarm |
//!
//! The POST poll route carries no session check; it is called service to
//! service. Errors are `{ "success": false, "message": ... }`.

use axum::{
    extract::{rejection::JsonRejection, FromRef, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use hive_core::domain::session::SessionProvider;
use hive_core::presentation::api::{failure, require_session, AuthRejection, AuthSession};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

use crate::application::{
    ReconcileError, ReconcileOutcome, ReconcileSwarmUseCase, ReconcileTrigger,
    RegisterSwarmRequest, RegisterSwarmUseCase,
};
use crate::domain::{SwarmLookup, SwarmRecord, SwarmStatus};

const POLL_FAILED: &str = "Failed to poll swarm status";
const REGISTER_FAILED: &str = "Failed to register swarm";

#[derive(Clone)]
pub struct SwarmApiState {
    pub reconciler: Arc<dyn ReconcileSwarmUseCase>,
    pub register: Arc<dyn RegisterSwarmUseCase>,
    pub sessions: Arc<dyn SessionProvider>,
}

impl FromRef<SwarmApiState> for Arc<dyn SessionProvider> {
    fn from_ref(state: &SwarmApiState) -> Self {
        state.sessions.clone()
    }
}

pub fn swarm_routes(state: SwarmApiState) -> Router {
    Router::new()
        .route("/api/swarm/poll", post(poll_by_lookup).get(poll_by_id))
        .route("/api/swarm", post(register_swarm))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollRequest {
    pub workspace_id: Option<String>,
    pub swarm_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PollQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PollResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(rename = "alreadyActive", skip_serializing_if = "Option::is_none")]
    pub already_active: Option<bool>,
    pub status: SwarmStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl PollResponse {
    fn new(success: bool, status: SwarmStatus) -> Self {
        Self {
            success,
            message: None,
            already_active: None,
            status,
            data: None,
            details: None,
        }
    }

    fn operator(outcome: ReconcileOutcome) -> Self {
        let status = outcome.status();
        match outcome {
            ReconcileOutcome::AlreadyActive => Self {
                message: Some("Swarm is already active"),
                already_active: Some(true),
                ..Self::new(true, status)
            },
            ReconcileOutcome::Activated { details } => Self {
                message: Some("Swarm is now active"),
                data: details,
                ..Self::new(true, status)
            },
            ReconcileOutcome::NotReady { .. } => Self {
                message: Some("Swarm is not yet active"),
                ..Self::new(false, status)
            },
            ReconcileOutcome::StatusOnly { .. } => Self::new(true, status),
        }
    }

    fn read(outcome: ReconcileOutcome) -> Self {
        let status = outcome.status();
        match outcome {
            ReconcileOutcome::AlreadyActive => Self {
                already_active: Some(true),
                ..Self::new(true, status)
            },
            ReconcileOutcome::Activated { details } => Self {
                message: Some("Swarm is now active"),
                details,
                ..Self::new(true, status)
            },
            ReconcileOutcome::NotReady { details, .. } => Self {
                details,
                ..Self::new(false, status)
            },
            ReconcileOutcome::StatusOnly { .. } => Self::new(true, status),
        }
    }
}

/// Public view of a swarm record. The credential is never included.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwarmView {
    pub id: String,
    pub workspace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swarm_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swarm_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swarm_secret_alias: Option<String>,
    pub status: SwarmStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SwarmRecord> for SwarmView {
    fn from(record: SwarmRecord) -> Self {
        Self {
            id: record.id.to_string(),
            workspace_id: record.workspace_key.to_string(),
            swarm_id: record.swarm_id.map(|id| id.to_string()),
            name: record.name,
            swarm_url: record.swarm_url,
            swarm_secret_alias: record.swarm_secret_alias,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSwarmBody {
    pub workspace_id: String,
    pub swarm_id: Option<String>,
    pub name: Option<String>,
    pub swarm_url: Option<String>,
    pub placeholder_api_key: Option<String>,
}

impl IntoResponse for ReconcileError {
    fn into_response(self) -> Response {
        error_response(self, POLL_FAILED)
    }
}

fn error_response(err: ReconcileError, internal_message: &str) -> Response {
    match err {
        ReconcileError::InvalidRequest | ReconcileError::MissingConfiguration(_) => {
            failure(StatusCode::BAD_REQUEST, &err.to_string())
        }
        ReconcileError::NotFound => failure(StatusCode::NOT_FOUND, &err.to_string()),
        ReconcileError::Unauthorized => failure(StatusCode::UNAUTHORIZED, &err.to_string()),
        ReconcileError::Internal(detail) => {
            error!("{}: {}", internal_message, detail);
            failure(StatusCode::INTERNAL_SERVER_ERROR, internal_message)
        }
    }
}

impl From<AuthRejection> for ReconcileError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::Unauthorized => ReconcileError::Unauthorized,
            AuthRejection::ProviderFailure => {
                ReconcileError::Internal("session provider failure".to_string())
            }
        }
    }
}

/// POST /api/swarm/poll
async fn poll_by_lookup(
    State(state): State<SwarmApiState>,
    body: Result<Json<PollRequest>, JsonRejection>,
) -> Result<Json<PollResponse>, ReconcileError> {
    let Json(request) = body.map_err(|e| {
        debug!("Rejected poll body: {}", e);
        ReconcileError::InvalidRequest
    })?;

    let lookup = SwarmLookup::new(request.workspace_id, request.swarm_id);
    let outcome = state
        .reconciler
        .reconcile(&lookup, ReconcileTrigger::Operator)
        .await?;

    Ok(Json(PollResponse::operator(outcome)))
}

/// GET /api/swarm/poll?id=
async fn poll_by_id(
    State(state): State<SwarmApiState>,
    Query(query): Query<PollQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(id) = query.id.filter(|id| !id.is_empty()) else {
        return failure(StatusCode::BAD_REQUEST, "Missing id parameter");
    };

    if let Err(rejection) = require_session(state.sessions.as_ref(), &headers).await {
        return ReconcileError::from(rejection).into_response();
    }

    match state
        .reconciler
        .reconcile(&SwarmLookup::by_swarm_id(id), ReconcileTrigger::Read)
        .await
    {
        Ok(outcome) => Json(PollResponse::read(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/swarm
async fn register_swarm(
    State(state): State<SwarmApiState>,
    AuthSession(session): AuthSession,
    body: Result<Json<RegisterSwarmBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return failure(StatusCode::BAD_REQUEST, "Missing workspaceId");
    };

    debug!("User {} registering swarm for workspace {}", session.user.id, body.workspace_id);

    let request = RegisterSwarmRequest {
        workspace_key: body.workspace_id,
        swarm_id: body.swarm_id,
        name: body.name,
        swarm_url: body.swarm_url,
        placeholder_api_key: body.placeholder_api_key,
    };

    match state.register.register(request).await {
        Ok(record) => (StatusCode::CREATED, Json(SwarmView::from(record))).into_response(),
        Err(e) => error_response(e, REGISTER_FAILED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_response_shapes() {
        let body = serde_json::to_value(PollResponse::operator(ReconcileOutcome::Activated {
            details: Some(json!({"x_api_key": "tok"})),
        }))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "success": true,
                "message": "Swarm is now active",
                "status": "ACTIVE",
                "data": {"x_api_key": "tok"}
            })
        );

        let body = serde_json::to_value(PollResponse::operator(ReconcileOutcome::NotReady {
            status: SwarmStatus::Pending,
            details: Some(json!({"success": false})),
        }))
        .unwrap();
        assert_eq!(
            body,
            json!({"success": false, "message": "Swarm is not yet active", "status": "PENDING"})
        );
    }

    #[test]
    fn test_already_active_is_flagged() {
        let body = serde_json::to_value(PollResponse::operator(ReconcileOutcome::AlreadyActive))
            .unwrap();
        assert_eq!(
            body,
            json!({
                "success": true,
                "message": "Swarm is already active",
                "alreadyActive": true,
                "status": "ACTIVE"
            })
        );

        let body =
            serde_json::to_value(PollResponse::read(ReconcileOutcome::AlreadyActive)).unwrap();
        assert_eq!(body, json!({"success": true, "alreadyActive": true, "status": "ACTIVE"}));
    }

    #[test]
    fn test_read_response_shapes() {
        let body = serde_json::to_value(PollResponse::read(ReconcileOutcome::StatusOnly {
            status: SwarmStatus::Pending,
        }))
        .unwrap();
        assert_eq!(body, json!({"success": true, "status": "PENDING"}));

        let body = serde_json::to_value(PollResponse::read(ReconcileOutcome::NotReady {
            status: SwarmStatus::Failed,
            details: Some(json!({"success": false})),
        }))
        .unwrap();
        assert_eq!(
            body,
            json!({"success": false, "status": "FAILED", "details": {"success": false}})
        );
    }

    #[test]
    fn test_error_statuses() {
        use crate::application::MissingField;

        let cases = [
            (ReconcileError::InvalidRequest, StatusCode::BAD_REQUEST),
            (ReconcileError::NotFound, StatusCode::NOT_FOUND),
            (
                ReconcileError::MissingConfiguration(MissingField::Endpoint),
                StatusCode::BAD_REQUEST,
            ),
            (ReconcileError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                ReconcileError::Internal("db down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
