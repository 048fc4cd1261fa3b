// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Postgres Swarm Repository
//!
//! Persists [`SwarmRecord`]s in the `swarms` table. `workspace_id` is unique,
//! so the upsert is a single `INSERT ... ON CONFLICT` statement; absent update
//! fields are `COALESCE`d with the stored values.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hive_core::domain::repository::RepositoryError;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::{
    Credential, SwarmId, SwarmRecord, SwarmRecordId, SwarmRepository, SwarmStatus, SwarmUpdate,
    WorkspaceKey,
};

const SWARM_COLUMNS: &str = "id, workspace_id, swarm_id, name, swarm_url, swarm_api_key, \
                             swarm_secret_alias, status, created_at, updated_at";

pub struct PostgresSwarmRepository {
    pool: PgPool,
}

impl PostgresSwarmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SwarmRepository for PostgresSwarmRepository {
    async fn find_by_workspace(
        &self,
        workspace_key: &WorkspaceKey,
    ) -> Result<Option<SwarmRecord>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM swarms WHERE workspace_id = $1",
            SWARM_COLUMNS
        ))
        .bind(workspace_key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.map(parse_swarm_row).transpose()
    }

    async fn find_by_swarm_id(
        &self,
        swarm_id: &SwarmId,
    ) -> Result<Option<SwarmRecord>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM swarms WHERE swarm_id = $1 ORDER BY created_at LIMIT 1",
            SWARM_COLUMNS
        ))
        .bind(swarm_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.map(parse_swarm_row).transpose()
    }

    async fn upsert(
        &self,
        workspace_key: &WorkspaceKey,
        update: SwarmUpdate,
    ) -> Result<SwarmRecord, RepositoryError> {
        let row = self
            .execute_upsert(workspace_key, &update, "")
            .await?
            .ok_or_else(|| RepositoryError::Database("Upsert returned no row".to_string()))?;

        parse_swarm_row(row)
    }

    async fn upsert_unless_active(
        &self,
        workspace_key: &WorkspaceKey,
        update: SwarmUpdate,
    ) -> Result<SwarmRecord, RepositoryError> {
        // No row back means the conflicting record is ACTIVE and was left alone
        match self
            .execute_upsert(workspace_key, &update, "WHERE swarms.status <> 'ACTIVE'")
            .await?
        {
            Some(row) => parse_swarm_row(row),
            None => self.find_by_workspace(workspace_key).await?.ok_or_else(|| {
                RepositoryError::NotFound(format!("swarm for workspace {}", workspace_key))
            }),
        }
    }
}

impl PostgresSwarmRepository {
    async fn execute_upsert(
        &self,
        workspace_key: &WorkspaceKey,
        update: &SwarmUpdate,
        conflict_guard: &str,
    ) -> Result<Option<PgRow>, RepositoryError> {
        sqlx::query(&upsert_statement(conflict_guard))
            .bind(SwarmRecordId::new().0)
            .bind(workspace_key.as_str())
            .bind(update.swarm_id.as_ref().map(SwarmId::as_str))
            .bind(update.name.as_deref())
            .bind(update.swarm_url.as_deref())
            .bind(update.swarm_api_key.as_ref().map(Credential::expose))
            .bind(update.swarm_secret_alias.as_deref())
            .bind(update.status.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to upsert swarm: {}", e)))
    }
}

fn upsert_statement(conflict_guard: &str) -> String {
    format!(
        r#"
        INSERT INTO swarms (
            id, workspace_id, swarm_id, name, swarm_url, swarm_api_key,
            swarm_secret_alias, status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'PENDING'), NOW(), NOW())
        ON CONFLICT (workspace_id) DO UPDATE SET
            swarm_id = COALESCE(EXCLUDED.swarm_id, swarms.swarm_id),
            name = COALESCE(EXCLUDED.name, swarms.name),
            swarm_url = COALESCE(EXCLUDED.swarm_url, swarms.swarm_url),
            swarm_api_key = COALESCE(EXCLUDED.swarm_api_key, swarms.swarm_api_key),
            swarm_secret_alias = COALESCE(EXCLUDED.swarm_secret_alias, swarms.swarm_secret_alias),
            status = COALESCE($8, swarms.status),
            updated_at = NOW()
        {}
        RETURNING {}
        "#,
        conflict_guard, SWARM_COLUMNS
    )
}

fn parse_swarm_row(row: PgRow) -> Result<SwarmRecord, RepositoryError> {
    let id: uuid::Uuid = row.try_get("id")?;
    let workspace_id: String = row.try_get("workspace_id")?;
    let swarm_id: Option<String> = row.try_get("swarm_id")?;
    let swarm_api_key: Option<String> = row.try_get("swarm_api_key")?;
    let status: String = row.try_get("status")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    let status: SwarmStatus = status.parse().map_err(RepositoryError::Serialization)?;

    Ok(SwarmRecord {
        id: SwarmRecordId(id),
        workspace_key: WorkspaceKey::new(workspace_id),
        swarm_id: swarm_id.map(SwarmId::new),
        name: row.try_get("name")?,
        swarm_url: row.try_get("swarm_url")?,
        swarm_api_key: swarm_api_key.map(Credential::new),
        swarm_secret_alias: row.try_get("swarm_secret_alias")?,
        status,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_upsert_skips_active_rows() {
        let guarded = upsert_statement("WHERE swarms.status <> 'ACTIVE'");
        let update_at = guarded.find("DO UPDATE SET").unwrap();
        let guard_at = guarded.find("WHERE swarms.status <> 'ACTIVE'").unwrap();
        let returning_at = guarded.find("RETURNING").unwrap();
        assert!(update_at < guard_at && guard_at < returning_at);

        assert!(!upsert_statement("").contains("WHERE"));
    }
}
