// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Aggregate
//!
//! A **Swarm** is one infrastructure unit provisioned for a workspace by the
//! third-party orchestration API.
//!
//! - [`SwarmRecord`] - aggregate root, one per workspace.
//! - [`WorkspaceKey`] / [`SwarmId`] - the two lookup keys.
//! - [`Credential`] - secret API key; never printed.
//! - [`SwarmLookup`] - caller-supplied lookup, resolved with workspace precedence.
//!
//! # Invariants
//!
//! - `status == Active` is only ever written by the reconciliation engine,
//!   together with the credential alias.
//! - A record is never deleted here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Primary key of a [`SwarmRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwarmRecordId(pub Uuid);

impl SwarmRecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SwarmRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SwarmRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owning workspace. Unique per swarm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceKey(String);

impl WorkspaceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier assigned by the remote orchestration API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwarmId(String);

impl SwarmId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SwarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Swarm API key. `Debug` is redacted so records can be logged freely.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwarmStatus {
    Pending,
    Active,
    Failed,
}

impl SwarmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwarmStatus::Pending => "PENDING",
            SwarmStatus::Active => "ACTIVE",
            SwarmStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for SwarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwarmStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(SwarmStatus::Pending),
            "ACTIVE" => Ok(SwarmStatus::Active),
            "FAILED" => Ok(SwarmStatus::Failed),
            other => Err(format!("unknown swarm status '{}'", other)),
        }
    }
}

/// Aggregate root for a provisioned (or provisioning) swarm.
#[derive(Debug, Clone, PartialEq)]
pub struct SwarmRecord {
    pub id: SwarmRecordId,
    pub workspace_key: WorkspaceKey,
    pub swarm_id: Option<SwarmId>,
    pub name: Option<String>,
    /// Network address of the swarm once known
    pub swarm_url: Option<String>,
    pub swarm_api_key: Option<Credential>,
    /// `{{SWARM_<N>_API_KEY}}` reference to the secret, never the secret itself
    pub swarm_secret_alias: Option<String>,
    pub status: SwarmStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SwarmRecord {
    pub fn new(workspace_key: WorkspaceKey) -> Self {
        let now = Utc::now();
        Self {
            id: SwarmRecordId::new(),
            workspace_key,
            swarm_id: None,
            name: None,
            swarm_url: None,
            swarm_api_key: None,
            swarm_secret_alias: None,
            status: SwarmStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SwarmStatus::Active
    }

    /// Remote swarm id, ignoring empty values
    pub fn usable_swarm_id(&self) -> Option<&SwarmId> {
        self.swarm_id.as_ref().filter(|id| !id.as_str().is_empty())
    }

    pub fn has_endpoint(&self) -> bool {
        self.swarm_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    pub fn has_credential(&self) -> bool {
        self.swarm_api_key
            .as_ref()
            .is_some_and(|key| !key.expose().is_empty())
    }

    /// Identifier sent to the remote API: the swarm id, else the primary key
    pub fn resource_identifier(&self) -> String {
        match self.usable_swarm_id() {
            Some(id) => id.as_str().to_string(),
            None => self.id.to_string(),
        }
    }

    /// Apply the present fields of an update
    pub fn apply(&mut self, update: SwarmUpdate) {
        if let Some(swarm_id) = update.swarm_id {
            self.swarm_id = Some(swarm_id);
        }
        if let Some(name) = update.name {
            self.name = Some(name);
        }
        if let Some(url) = update.swarm_url {
            self.swarm_url = Some(url);
        }
        if let Some(key) = update.swarm_api_key {
            self.swarm_api_key = Some(key);
        }
        if let Some(alias) = update.swarm_secret_alias {
            self.swarm_secret_alias = Some(alias);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial write to a [`SwarmRecord`]. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwarmUpdate {
    pub swarm_id: Option<SwarmId>,
    pub name: Option<String>,
    pub swarm_url: Option<String>,
    pub swarm_api_key: Option<Credential>,
    pub swarm_secret_alias: Option<String>,
    pub status: Option<SwarmStatus>,
}

/// Resolved lookup key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Workspace(WorkspaceKey),
    Swarm(SwarmId),
}

/// Caller-supplied lookup; empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwarmLookup {
    pub workspace_key: Option<WorkspaceKey>,
    pub swarm_id: Option<SwarmId>,
}

impl SwarmLookup {
    pub fn new(workspace_key: Option<String>, swarm_id: Option<String>) -> Self {
        Self {
            workspace_key: workspace_key.filter(|k| !k.is_empty()).map(WorkspaceKey::new),
            swarm_id: swarm_id.filter(|id| !id.is_empty()).map(SwarmId::new),
        }
    }

    pub fn by_workspace(key: impl Into<String>) -> Self {
        Self::new(Some(key.into()), None)
    }

    pub fn by_swarm_id(id: impl Into<String>) -> Self {
        Self::new(None, Some(id.into()))
    }

    /// Workspace key wins when both are present
    pub fn resolve(&self) -> Option<LookupKey> {
        match (&self.workspace_key, &self.swarm_id) {
            (Some(key), _) => Some(LookupKey::Workspace(key.clone())),
            (None, Some(id)) => Some(LookupKey::Swarm(id.clone())),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_prefers_workspace() {
        let lookup = SwarmLookup::new(Some("ws-1".into()), Some("swarm42".into()));
        assert_eq!(
            lookup.resolve(),
            Some(LookupKey::Workspace(WorkspaceKey::new("ws-1")))
        );
        assert_eq!(
            SwarmLookup::by_swarm_id("swarm42").resolve(),
            Some(LookupKey::Swarm(SwarmId::new("swarm42")))
        );
    }

    #[test]
    fn test_lookup_treats_empty_as_absent() {
        assert_eq!(SwarmLookup::new(Some(String::new()), None).resolve(), None);
        assert_eq!(
            SwarmLookup::new(Some(String::new()), Some("s1".into())).resolve(),
            Some(LookupKey::Swarm(SwarmId::new("s1")))
        );
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let key = Credential::new("tok123");
        assert_eq!(format!("{:?}", key), "Credential(***)");

        let mut record = SwarmRecord::new(WorkspaceKey::new("ws"));
        record.swarm_api_key = Some(key);
        assert!(!format!("{:?}", record).contains("tok123"));
    }

    #[test]
    fn test_resource_identifier_falls_back_to_primary_key() {
        let mut record = SwarmRecord::new(WorkspaceKey::new("ws"));
        assert_eq!(record.resource_identifier(), record.id.to_string());

        record.swarm_id = Some(SwarmId::new(""));
        assert_eq!(record.resource_identifier(), record.id.to_string());

        record.swarm_id = Some(SwarmId::new("swarm9"));
        assert_eq!(record.resource_identifier(), "swarm9");
    }

    #[test]
    fn test_apply_keeps_absent_fields() {
        let mut record = SwarmRecord::new(WorkspaceKey::new("ws"));
        record.swarm_api_key = Some(Credential::new("placeholder"));
        record.swarm_url = Some("https://swarm.example".into());

        record.apply(SwarmUpdate {
            status: Some(SwarmStatus::Active),
            swarm_secret_alias: Some("{{SWARM_1_API_KEY}}".into()),
            ..Default::default()
        });

        assert_eq!(record.status, SwarmStatus::Active);
        assert_eq!(record.swarm_api_key, Some(Credential::new("placeholder")));
        assert_eq!(record.swarm_url.as_deref(), Some("https://swarm.example"));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [SwarmStatus::Pending, SwarmStatus::Active, SwarmStatus::Failed] {
            assert_eq!(status.as_str().parse::<SwarmStatus>(), Ok(status));
        }
        assert!("DELETED".parse::<SwarmStatus>().is_err());
        assert_eq!(
            serde_json::to_value(SwarmStatus::Active).unwrap(),
            serde_json::json!("ACTIVE")
        );
    }
}
