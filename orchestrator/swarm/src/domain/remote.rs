// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Remote status port.
//!
//! The orchestration API's answer to "is this swarm ready?", decoded once at
//! the adapter boundary into a [`FetchOutcome`]. Retry and timeout handling
//! belong to the adapter.

use async_trait::async_trait;
use serde_json::Value;

use super::swarm::Credential;

/// Payload of a successful details response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwarmDetails {
    /// The response's `data` object, passed through to callers untouched
    pub data: Option<Value>,
}

impl SwarmDetails {
    pub fn new(data: Option<Value>) -> Self {
        Self { data }
    }

    /// `data.x_api_key`, if present and a string
    pub fn api_key(&self) -> Option<Credential> {
        self.data
            .as_ref()
            .and_then(|data| data.get("x_api_key"))
            .and_then(Value::as_str)
            .map(Credential::new)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The remote could not be reached; says nothing about the swarm itself
    TransportFailure(String),
    /// The remote answered but the swarm is not ready
    RemoteFailure { body: Option<Value> },
    RemoteSuccess(SwarmDetails),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Malformed swarm details response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait SwarmStatusFetcher: Send + Sync {
    async fn fetch(&self, identifier: &str) -> Result<FetchOutcome, FetchError>;
}
