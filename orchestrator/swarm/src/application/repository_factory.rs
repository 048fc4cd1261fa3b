// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory
//!
//! Picks the concrete [`SwarmRepository`] for the configured storage backend.

use hive_core::domain::repository::StorageBackend;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::SwarmRepository;
use crate::infrastructure::repositories::{InMemorySwarmRepository, PostgresSwarmRepository};

/// `pool` is required for the PostgreSQL backend and ignored otherwise
pub fn create_swarm_repository(
    backend: &StorageBackend,
    pool: Option<PgPool>,
) -> anyhow::Result<Arc<dyn SwarmRepository>> {
    match (backend, pool) {
        (StorageBackend::InMemory, _) => Ok(Arc::new(InMemorySwarmRepository::new())),
        (StorageBackend::PostgreSQL(_), Some(pool)) => {
            Ok(Arc::new(PostgresSwarmRepository::new(pool)))
        }
        (StorageBackend::PostgreSQL(_), None) => Err(anyhow::anyhow!(
            "PostgreSQL storage backend selected but no connection pool was provided"
        )),
    }
}
