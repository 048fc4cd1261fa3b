// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Connection Pool
//!
//! Wraps `sqlx::postgres::PgPool` in a thin `Database` newtype that can be
//! injected into all PostgreSQL repository implementations.
//!
//! Only needed when `spec.database.url` is configured; the in-memory backend
//! runs without a pool.

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::hive_config::DatabaseConfig;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(connection_string)
            .await
            .context("Failed to connect to PostgreSQL")?;

        Ok(Self { pool })
    }

    /// Connect using the database section of the configuration, if a URL is set
    pub async fn from_config(config: &DatabaseConfig) -> Result<Option<Self>> {
        match config.url.as_deref() {
            Some(url) if !url.is_empty() => Ok(Some(Self::new(url, config.max_connections).await?)),
            _ => Ok(None),
        }
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}
