// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Reconcile Swarm Use Case
//!
//! Asks the orchestration API whether a swarm has finished provisioning and,
//! when it has, synchronises the issued credential into the local record.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Drive one reconciliation pass for one swarm
//! - **Collaborators:**
//!   - Domain: SwarmRecord, derive_alias
//!   - Ports: SwarmRepository, SwarmStatusFetcher
//!
//! # Flow
//!
//! 1. Resolve the lookup (workspace key wins over swarm id)
//! 2. Load the record
//! 3. Short-circuit if the swarm is already ACTIVE (no remote call)
//! 4. Read trigger only: without a swarm id, report the stored status
//! 5. Require an endpoint URL, and for the operator trigger a placeholder key
//! 6. Fetch remote details for the swarm id (else the record's primary key)
//! 7. On remote success, upsert ACTIVE + credential + alias by workspace key
//!
//! At most one read, one remote call and one write per pass. Concurrent
//! passes for the same swarm are not serialised; the last upsert wins.

use async_trait::async_trait;
use hive_core::domain::repository::RepositoryError;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::{
    derive_alias, FetchError, FetchOutcome, SwarmLookup, SwarmRepository, SwarmStatus,
    SwarmStatusFetcher, SwarmUpdate,
};

/// Which entry point started the pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileTrigger {
    /// Service-to-service call; requires a placeholder credential
    Operator,
    /// Authenticated status read by swarm id
    Read,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    AlreadyActive,
    Activated { details: Option<Value> },
    NotReady { status: SwarmStatus, details: Option<Value> },
    /// Read trigger on a record with no swarm id; nothing was fetched
    StatusOnly { status: SwarmStatus },
}

impl ReconcileOutcome {
    /// Whether the swarm is usable after this pass
    pub fn ready(&self) -> bool {
        match self {
            ReconcileOutcome::AlreadyActive | ReconcileOutcome::Activated { .. } => true,
            ReconcileOutcome::NotReady { .. } => false,
            ReconcileOutcome::StatusOnly { status } => *status == SwarmStatus::Active,
        }
    }

    pub fn status(&self) -> SwarmStatus {
        match self {
            ReconcileOutcome::AlreadyActive | ReconcileOutcome::Activated { .. } => {
                SwarmStatus::Active
            }
            ReconcileOutcome::NotReady { status, .. } | ReconcileOutcome::StatusOnly { status } => {
                *status
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ReconcileOutcome::AlreadyActive => "already_active",
            ReconcileOutcome::Activated { .. } => "activated",
            ReconcileOutcome::NotReady { .. } => "not_ready",
            ReconcileOutcome::StatusOnly { .. } => "status_only",
        }
    }
}

/// Record field that must be set before polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Endpoint,
    Credential,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::Endpoint => f.write_str("URL"),
            MissingField::Credential => f.write_str("API key"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Missing workspaceId or swarmId")]
    InvalidRequest,

    #[error("Swarm not found")]
    NotFound,

    #[error("Swarm {0} not set")]
    MissingConfiguration(MissingField),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ReconcileError {
    fn from(e: RepositoryError) -> Self {
        ReconcileError::Internal(e.to_string())
    }
}

impl From<FetchError> for ReconcileError {
    fn from(e: FetchError) -> Self {
        ReconcileError::Internal(e.to_string())
    }
}

#[async_trait]
pub trait ReconcileSwarmUseCase: Send + Sync {
    async fn reconcile(
        &self,
        lookup: &SwarmLookup,
        trigger: ReconcileTrigger,
    ) -> Result<ReconcileOutcome, ReconcileError>;
}

pub struct SwarmReconciler {
    repository: Arc<dyn SwarmRepository>,
    fetcher: Arc<dyn SwarmStatusFetcher>,
}

impl SwarmReconciler {
    pub fn new(repository: Arc<dyn SwarmRepository>, fetcher: Arc<dyn SwarmStatusFetcher>) -> Self {
        Self {
            repository,
            fetcher,
        }
    }

    async fn run(
        &self,
        lookup: &SwarmLookup,
        trigger: ReconcileTrigger,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let key = lookup.resolve().ok_or(ReconcileError::InvalidRequest)?;

        let record = self
            .repository
            .find(&key)
            .await?
            .ok_or(ReconcileError::NotFound)?;

        if record.is_active() {
            debug!("Swarm for workspace {} already active", record.workspace_key);
            return Ok(ReconcileOutcome::AlreadyActive);
        }

        if trigger == ReconcileTrigger::Read && record.usable_swarm_id().is_none() {
            return Ok(ReconcileOutcome::StatusOnly {
                status: record.status,
            });
        }

        if !record.has_endpoint() {
            return Err(ReconcileError::MissingConfiguration(MissingField::Endpoint));
        }

        if trigger == ReconcileTrigger::Operator && !record.has_credential() {
            return Err(ReconcileError::MissingConfiguration(MissingField::Credential));
        }

        let identifier = record.resource_identifier();
        let outcome = self.fetcher.fetch(&identifier).await?;

        match outcome {
            FetchOutcome::TransportFailure(reason) => {
                warn!("Swarm {} unreachable, status left as {}: {}", identifier, record.status, reason);
                metrics::counter!("hive_swarm_remote_fetch_total", "result" => "transport_failure")
                    .increment(1);
                Ok(ReconcileOutcome::NotReady {
                    status: record.status,
                    details: None,
                })
            }
            FetchOutcome::RemoteFailure { body } => {
                debug!("Swarm {} not ready yet", identifier);
                metrics::counter!("hive_swarm_remote_fetch_total", "result" => "remote_failure")
                    .increment(1);
                Ok(ReconcileOutcome::NotReady {
                    status: record.status,
                    details: body,
                })
            }
            FetchOutcome::RemoteSuccess(details) => {
                metrics::counter!("hive_swarm_remote_fetch_total", "result" => "remote_success")
                    .increment(1);

                let alias = derive_alias(&identifier);
                let update = SwarmUpdate {
                    status: Some(SwarmStatus::Active),
                    swarm_api_key: details.api_key(),
                    swarm_secret_alias: Some(alias),
                    ..Default::default()
                };

                self.repository.upsert(&record.workspace_key, update).await?;
                info!("Swarm {} for workspace {} is now active", identifier, record.workspace_key);

                Ok(ReconcileOutcome::Activated {
                    details: details.data,
                })
            }
        }
    }
}

#[async_trait]
impl ReconcileSwarmUseCase for SwarmReconciler {
    async fn reconcile(
        &self,
        lookup: &SwarmLookup,
        trigger: ReconcileTrigger,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let result = self.run(lookup, trigger).await;

        let label = match &result {
            Ok(outcome) => outcome.label(),
            Err(ReconcileError::Internal(e)) => {
                error!("Swarm reconciliation failed: {}", e);
                "error"
            }
            Err(_) => "rejected",
        };
        metrics::counter!("hive_swarm_reconcile_total", "outcome" => label).increment(1);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_ready_and_status() {
        assert!(ReconcileOutcome::AlreadyActive.ready());
        assert!(ReconcileOutcome::Activated { details: None }.ready());

        let pending = ReconcileOutcome::NotReady {
            status: SwarmStatus::Pending,
            details: None,
        };
        assert!(!pending.ready());
        assert_eq!(pending.status(), SwarmStatus::Pending);

        assert!(!ReconcileOutcome::StatusOnly {
            status: SwarmStatus::Failed
        }
        .ready());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ReconcileError::MissingConfiguration(MissingField::Endpoint).to_string(),
            "Swarm URL not set"
        );
        assert_eq!(
            ReconcileError::MissingConfiguration(MissingField::Credential).to_string(),
            "Swarm API key not set"
        );
        assert_eq!(ReconcileError::NotFound.to_string(), "Swarm not found");
    }
}
