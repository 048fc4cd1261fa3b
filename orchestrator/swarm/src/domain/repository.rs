// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Swarm repository port.
//!
//! A key-value record store: one [`SwarmRecord`] per workspace, findable by
//! either key, written only through the workspace-keyed upsert.

use async_trait::async_trait;
use hive_core::domain::repository::RepositoryError;

use super::swarm::{LookupKey, SwarmId, SwarmRecord, SwarmUpdate, WorkspaceKey};

#[async_trait]
pub trait SwarmRepository: Send + Sync {
    async fn find_by_workspace(
        &self,
        workspace_key: &WorkspaceKey,
    ) -> Result<Option<SwarmRecord>, RepositoryError>;

    async fn find_by_swarm_id(&self, swarm_id: &SwarmId)
        -> Result<Option<SwarmRecord>, RepositoryError>;

    /// Create the record for the workspace if absent, then apply the present
    /// fields of `update`. No version check: the last writer wins.
    async fn upsert(
        &self,
        workspace_key: &WorkspaceKey,
        update: SwarmUpdate,
    ) -> Result<SwarmRecord, RepositoryError>;

    /// Like [`upsert`](Self::upsert), but leaves an ACTIVE record untouched
    /// and returns it. The status check and the write are one atomic step.
    async fn upsert_unless_active(
        &self,
        workspace_key: &WorkspaceKey,
        update: SwarmUpdate,
    ) -> Result<SwarmRecord, RepositoryError>;

    async fn find(&self, key: &LookupKey) -> Result<Option<SwarmRecord>, RepositoryError> {
        match key {
            LookupKey::Workspace(workspace_key) => self.find_by_workspace(workspace_key).await,
            LookupKey::Swarm(swarm_id) => self.find_by_swarm_id(swarm_id).await,
        }
    }
}
