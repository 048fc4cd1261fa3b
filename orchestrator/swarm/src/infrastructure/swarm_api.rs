// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Swarm Orchestration API Client
//!
//! Implements the [`SwarmStatusFetcher`] port against the third-party
//! orchestration API's super-admin details endpoint:
//!
//! ```text
//! GET {base_url}/api/super/details?id={swarm_id}
//! x-super-token: {super_admin_key}
//! ```
//!
//! Retries and timeouts are handled by [`RetryingHttpClient`]; this adapter
//! only decodes the final response into a [`FetchOutcome`].

use async_trait::async_trait;
use hive_core::domain::hive_config::{resolve_secret, SwarmApiConfig};
use hive_core::infrastructure::http_client::{HttpClientError, RetryingHttpClient};
use serde_json::Value;
use tracing::debug;

use crate::domain::{FetchError, FetchOutcome, SwarmDetails, SwarmStatusFetcher};

const DETAILS_PATH: &str = "/api/super/details";
const SUPER_TOKEN_HEADER: &str = "x-super-token";

#[derive(Debug, thiserror::Error)]
pub enum SwarmApiError {
    #[error("Swarm API is not configured: {0}")]
    Configuration(String),

    #[error(transparent)]
    Http(#[from] HttpClientError),
}

pub struct HttpSwarmStatusFetcher {
    http: RetryingHttpClient,
    base_url: String,
    super_admin_key: String,
}

impl HttpSwarmStatusFetcher {
    pub fn new(
        base_url: impl Into<String>,
        super_admin_key: impl Into<String>,
        http: RetryingHttpClient,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            super_admin_key: super_admin_key.into(),
        }
    }

    pub fn from_config(config: &SwarmApiConfig) -> Result<Self, SwarmApiError> {
        if config.base_url.is_empty() {
            return Err(SwarmApiError::Configuration("swarm_api.base_url is not set".into()));
        }

        let key = resolve_secret(&config.super_admin_key)
            .map_err(|e| SwarmApiError::Configuration(e.to_string()))?
            .ok_or_else(|| {
                SwarmApiError::Configuration("swarm_api.super_admin_key is not set".into())
            })?;

        let http = RetryingHttpClient::for_swarm_api(config)?;
        Ok(Self::new(config.base_url.clone(), key, http))
    }
}

#[async_trait]
impl SwarmStatusFetcher for HttpSwarmStatusFetcher {
    async fn fetch(&self, identifier: &str) -> Result<FetchOutcome, FetchError> {
        let url = format!("{}{}", self.base_url, DETAILS_PATH);

        let response = match self
            .http
            .get_json(
                &url,
                &[("id", identifier)],
                &[(SUPER_TOKEN_HEADER, self.super_admin_key.as_str())],
            )
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(FetchOutcome::TransportFailure(e.to_string())),
        };

        if !response.is_success() {
            debug!("Swarm details for {} returned HTTP {}", identifier, response.status);
            return Ok(FetchOutcome::RemoteFailure {
                body: response.body,
            });
        }

        let body = response.body.ok_or_else(|| {
            FetchError::Malformed(format!(
                "HTTP {} with a non-JSON body for swarm {}",
                response.status, identifier
            ))
        })?;

        Ok(decode_details(body))
    }
}

/// `{ "success": true, "data": {...} }` is the only ready shape
fn decode_details(body: Value) -> FetchOutcome {
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        FetchOutcome::RemoteSuccess(SwarmDetails::new(body.get("data").cloned()))
    } else {
        FetchOutcome::RemoteFailure { body: Some(body) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::infrastructure::http_client::RetryPolicy;
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    fn fetcher(url: &str, max_attempts: u32) -> HttpSwarmStatusFetcher {
        let http = RetryingHttpClient::new(
            "swarm",
            RetryPolicy::new(max_attempts, 1),
            Duration::from_secs(5),
        )
        .unwrap();
        HttpSwarmStatusFetcher::new(url, "super-secret", http)
    }

    #[tokio::test]
    async fn test_ready_swarm_decodes_to_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/super/details")
            .match_query(Matcher::UrlEncoded("id".into(), "swarm42".into()))
            .match_header("x-super-token", "super-secret")
            .with_status(200)
            .with_body(r#"{"success":true,"data":{"x_api_key":"tok123","address":"swarm42.example"}}"#)
            .create_async()
            .await;

        let outcome = fetcher(&server.url(), 1).fetch("swarm42").await.unwrap();

        match outcome {
            FetchOutcome::RemoteSuccess(details) => {
                assert_eq!(details.api_key().unwrap().expose(), "tok123");
                assert_eq!(details.data.unwrap()["address"], "swarm42.example");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unsuccessful_body_is_remote_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/super/details")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success":false,"message":"provisioning"}"#)
            .create_async()
            .await;

        let outcome = fetcher(&server.url(), 1).fetch("swarm42").await.unwrap();
        assert_eq!(
            outcome,
            FetchOutcome::RemoteFailure {
                body: Some(json!({"success": false, "message": "provisioning"}))
            }
        );
    }

    #[tokio::test]
    async fn test_missing_success_flag_is_remote_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/super/details")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":{"x_api_key":"tok123"}}"#)
            .create_async()
            .await;

        let outcome = fetcher(&server.url(), 1).fetch("swarm42").await.unwrap();
        assert!(matches!(outcome, FetchOutcome::RemoteFailure { .. }));
    }

    #[tokio::test]
    async fn test_error_status_is_remote_failure_after_retries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/super/details")
            .match_query(Matcher::Any)
            .with_status(502)
            .expect(2)
            .create_async()
            .await;

        let outcome = fetcher(&server.url(), 2).fetch("swarm42").await.unwrap();
        assert_eq!(outcome, FetchOutcome::RemoteFailure { body: None });
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_json_success_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/super/details")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>ok</html>")
            .create_async()
            .await;

        let result = fetcher(&server.url(), 1).fetch("swarm42").await;
        assert!(matches!(result, Err(FetchError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let outcome = fetcher("http://127.0.0.1:9", 1).fetch("swarm42").await.unwrap();
        assert!(matches!(outcome, FetchOutcome::TransportFailure(_)));
    }

    #[test]
    fn test_from_config_requires_url_and_key() {
        let mut config = SwarmApiConfig {
            base_url: String::new(),
            super_admin_key: Some("k".into()),
            max_attempts: 3,
            retry_delay_ms: 500,
            timeout_ms: 1000,
        };
        assert!(matches!(
            HttpSwarmStatusFetcher::from_config(&config),
            Err(SwarmApiError::Configuration(_))
        ));

        config.base_url = "https://swarm.example/".into();
        assert!(HttpSwarmStatusFetcher::from_config(&config).is_ok());

        config.super_admin_key = None;
        assert!(HttpSwarmStatusFetcher::from_config(&config).is_err());
    }
}
