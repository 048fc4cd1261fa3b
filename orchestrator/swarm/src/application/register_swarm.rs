// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Register Swarm Use Case
//!
//! Records that a workspace has requested a swarm. The record starts out
//! PENDING and is promoted to ACTIVE only by reconciliation.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::reconcile::ReconcileError;
use crate::domain::{
    Credential, SwarmId, SwarmRecord, SwarmRepository, SwarmStatus, SwarmUpdate, WorkspaceKey,
};

#[derive(Debug, Clone, Default)]
pub struct RegisterSwarmRequest {
    pub workspace_key: String,
    pub swarm_id: Option<String>,
    pub name: Option<String>,
    pub swarm_url: Option<String>,
    /// Placeholder key required before operator-triggered polling
    pub placeholder_api_key: Option<String>,
}

#[async_trait]
pub trait RegisterSwarmUseCase: Send + Sync {
    async fn register(&self, request: RegisterSwarmRequest) -> Result<SwarmRecord, ReconcileError>;
}

pub struct StandardRegisterSwarmUseCase {
    repository: Arc<dyn SwarmRepository>,
}

impl StandardRegisterSwarmUseCase {
    pub fn new(repository: Arc<dyn SwarmRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RegisterSwarmUseCase for StandardRegisterSwarmUseCase {
    async fn register(&self, request: RegisterSwarmRequest) -> Result<SwarmRecord, ReconcileError> {
        let workspace_key = request.workspace_key.trim();
        if workspace_key.is_empty() {
            return Err(ReconcileError::InvalidRequest);
        }
        let workspace_key = WorkspaceKey::new(workspace_key);

        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        let update = SwarmUpdate {
            swarm_id: non_empty(request.swarm_id).map(SwarmId::new),
            name: non_empty(request.name),
            swarm_url: non_empty(request.swarm_url),
            swarm_api_key: non_empty(request.placeholder_api_key).map(Credential::new),
            swarm_secret_alias: None,
            status: Some(SwarmStatus::Pending),
        };

        // An active swarm is never reset to PENDING
        let record = self
            .repository
            .upsert_unless_active(&workspace_key, update)
            .await?;
        if record.is_active() {
            info!("Swarm for workspace {} is already active", workspace_key);
        } else {
            info!("Registered pending swarm for workspace {}", workspace_key);
        }
        Ok(record)
    }
}
