// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Stakwork API Client
//!
//! Thin adapter over the Stakwork workflow platform: customers, secrets and
//! workflow projects. Secrets created here are what swarm credential aliases
//! (`{{SWARM_<N>_API_KEY}}`) resolve to on the Stakwork side.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Anti-corruption layer for the Stakwork REST API
//! - **Integration:** CLI / services → StakworkClient → RetryingHttpClient

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

use crate::domain::hive_config::{resolve_secret, StakworkConfig};
use crate::infrastructure::http_client::{HttpClientError, RetryPolicy, RetryingHttpClient};

#[derive(Debug, thiserror::Error)]
pub enum StakworkError {
    #[error("Stakwork is not configured: {0}")]
    Configuration(String),

    #[error(transparent)]
    Http(#[from] HttpClientError),

    #[error("Stakwork {endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16, body: Option<Value> },
}

/// `workflow_params.set_var.attributes.vars`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowParams {
    pub set_var: SetVar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetVar {
    pub attributes: SetVarAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetVarAttributes {
    pub vars: Value,
}

impl WorkflowParams {
    pub fn with_vars(vars: Value) -> Self {
        Self {
            set_var: SetVar {
                attributes: SetVarAttributes { vars },
            },
        }
    }
}

/// Body of a workflow run request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRequest {
    pub name: String,
    pub workflow_id: u64,
    pub workflow_params: WorkflowParams,
}

/// Body of a project creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub budget: Value,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(flatten)]
    pub workflow: WorkflowRequest,
}

pub struct StakworkClient {
    http: RetryingHttpClient,
    base_url: String,
    api_key: String,
}

impl StakworkClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        http: RetryingHttpClient,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &StakworkConfig) -> Result<Self, StakworkError> {
        let api_key = resolve_secret(&config.api_key)
            .map_err(|e| StakworkError::Configuration(e.to_string()))?
            .ok_or_else(|| StakworkError::Configuration("stakwork.api_key is not set".into()))?;

        let http = RetryingHttpClient::new("stakwork", RetryPolicy::default(), Duration::from_secs(30))?;
        Ok(Self::new(config.base_url.clone(), api_key, http))
    }

    pub async fn create_customer(&self, customer_name: &str) -> Result<Value, StakworkError> {
        self.post("/customers", &json!({ "customer": { "name": customer_name } }))
            .await
    }

    pub async fn create_secret(&self, name: &str, value: &str) -> Result<Value, StakworkError> {
        info!("Creating Stakwork secret '{}'", name);
        self.post("/secrets", &json!({ "secret": { "name": name, "value": value } }))
            .await
    }

    pub async fn create_project(&self, input: &ProjectInput) -> Result<Value, StakworkError> {
        self.post("/projects", input).await
    }

    /// Generic workflow request against an arbitrary Stakwork endpoint
    pub async fn stakwork_request(
        &self,
        endpoint: &str,
        input: &WorkflowRequest,
    ) -> Result<Value, StakworkError> {
        self.post(endpoint, input).await
    }

    async fn post<B>(&self, endpoint: &str, body: &B) -> Result<Value, StakworkError>
    where
        B: Serialize + ?Sized,
    {
        let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
        };
        let authorization = format!("Token token={}", self.api_key);

        let response = self
            .http
            .post_json(&url, body, &[("Authorization", authorization.as_str())])
            .await?;

        if !response.is_success() {
            return Err(StakworkError::Status {
                endpoint: endpoint.to_string(),
                status: response.status,
                body: response.body,
            });
        }

        Ok(response.body.unwrap_or(Value::Null))
    }
}

/// Secret name referenced by a credential alias: `{{SWARM_42_API_KEY}}` → `SWARM_42_API_KEY`
pub fn secret_name_from_alias(alias: &str) -> &str {
    alias
        .trim()
        .trim_start_matches("{{")
        .trim_end_matches("}}")
}
