// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Swarm Repository Implementations
//!
//! - **PostgresSwarmRepository** - `swarms` table, upsert on `workspace_id`
//! - **InMemorySwarmRepository** - HashMap-backed storage for development and tests
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)

pub mod postgres_swarm;

use async_trait::async_trait;
use hive_core::domain::repository::RepositoryError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{SwarmId, SwarmRecord, SwarmRepository, SwarmUpdate, WorkspaceKey};

pub use postgres_swarm::PostgresSwarmRepository;

#[derive(Clone, Default)]
pub struct InMemorySwarmRepository {
    swarms: Arc<RwLock<HashMap<WorkspaceKey, SwarmRecord>>>,
}

impl InMemorySwarmRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record as-is, replacing any record for the same workspace
    pub async fn insert(&self, record: SwarmRecord) {
        let mut swarms = self.swarms.write().await;
        swarms.insert(record.workspace_key.clone(), record);
    }
}

#[async_trait]
impl SwarmRepository for InMemorySwarmRepository {
    async fn find_by_workspace(
        &self,
        workspace_key: &WorkspaceKey,
    ) -> Result<Option<SwarmRecord>, RepositoryError> {
        let swarms = self.swarms.read().await;
        Ok(swarms.get(workspace_key).cloned())
    }

    /// Oldest matching record first, as in PostgreSQL
    async fn find_by_swarm_id(
        &self,
        swarm_id: &SwarmId,
    ) -> Result<Option<SwarmRecord>, RepositoryError> {
        let swarms = self.swarms.read().await;
        Ok(swarms
            .values()
            .filter(|s| s.swarm_id.as_ref() == Some(swarm_id))
            .min_by_key(|s| s.created_at)
            .cloned())
    }

    async fn upsert(
        &self,
        workspace_key: &WorkspaceKey,
        update: SwarmUpdate,
    ) -> Result<SwarmRecord, RepositoryError> {
        let mut swarms = self.swarms.write().await;
        let record = swarms
            .entry(workspace_key.clone())
            .or_insert_with(|| SwarmRecord::new(workspace_key.clone()));
        record.apply(update);
        Ok(record.clone())
    }

    async fn upsert_unless_active(
        &self,
        workspace_key: &WorkspaceKey,
        update: SwarmUpdate,
    ) -> Result<SwarmRecord, RepositoryError> {
        let mut swarms = self.swarms.write().await;
        let record = swarms
            .entry(workspace_key.clone())
            .or_insert_with(|| SwarmRecord::new(workspace_key.clone()));
        if !record.is_active() {
            record.apply(update);
        }
        Ok(record.clone())
    }
}
