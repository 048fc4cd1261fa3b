// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Retrying HTTP Client
//!
//! Outbound JSON client shared by every third-party adapter (swarm
//! orchestration API, Stakwork). Owns the retry and backoff behaviour so the
//! adapters built on top of it stay single-shot.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Send JSON requests with exponential backoff
//! - **Integration:** Adapter → RetryingHttpClient → reqwest
//!
//! # Retry Rules
//!
//! - Transport errors, HTTP 5xx and HTTP 429 are retried.
//! - Delay before retry *n* (0-based) is `base_delay_ms * 2^n`.
//! - Any other status is returned immediately, success or not.
//! - When attempts run out, a retryable status is returned as-is and a
//!   transport failure becomes [`HttpClientError::Transport`].

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::hive_config::SwarmApiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts (at least one is always made)
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms,
        }
    }

    /// Delay to wait after the given failed attempt (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 500)
    }
}

/// Status and decoded JSON body of a completed request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// `None` when the body is empty or not JSON
    pub body: Option<Value>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    #[error("{service} request failed after {attempts} attempt(s): {message}")]
    Transport {
        service: String,
        attempts: u32,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct RetryingHttpClient {
    client: Client,
    policy: RetryPolicy,
    service_name: String,
}

impl RetryingHttpClient {
    pub fn new(
        service_name: impl Into<String>,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Hive/1.0")
            .build()
            .map_err(|e| HttpClientError::Build(e.to_string()))?;

        Ok(Self {
            client,
            policy,
            service_name: service_name.into(),
        })
    }

    /// Client configured from the swarm API section of the configuration
    pub fn for_swarm_api(config: &SwarmApiConfig) -> Result<Self, HttpClientError> {
        Self::new(
            "swarm",
            RetryPolicy::new(config.max_attempts, config.retry_delay_ms),
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpClientError> {
        self.execute(url, || {
            let request = self.client.get(url).query(query);
            with_headers(request, headers)
        })
        .await
    }

    pub async fn post_json<B>(
        &self,
        url: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpClientError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(url, || {
            let request = self.client.post(url).json(body);
            with_headers(request, headers)
        })
        .await
    }

    async fn execute<F>(&self, url: &str, build: F) -> Result<HttpResponse, HttpClientError>
    where
        F: Fn() -> RequestBuilder,
    {
        let attempts = self.policy.max_attempts;
        let mut last_error = String::new();

        for attempt in 0..attempts {
            let is_last = attempt + 1 == attempts;

            match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    if is_retryable(status) && !is_last {
                        warn!(
                            "{} request to {} returned HTTP {} (attempt {}/{})",
                            self.service_name,
                            url,
                            status,
                            attempt + 1,
                            attempts
                        );
                        self.record_retry("status");
                        tokio::time::sleep(self.policy.delay_for(attempt)).await;
                        continue;
                    }

                    let bytes = response.bytes().await.map_err(|e| HttpClientError::Transport {
                        service: self.service_name.clone(),
                        attempts: attempt + 1,
                        message: format!("Failed to read response body: {}", e),
                    })?;

                    debug!(
                        "{} request to {} completed with HTTP {}",
                        self.service_name, url, status
                    );

                    return Ok(HttpResponse {
                        status: status.as_u16(),
                        body: serde_json::from_slice(&bytes).ok(),
                    });
                }
                Err(e) => {
                    warn!(
                        "{} request to {} failed (attempt {}/{}): {}",
                        self.service_name,
                        url,
                        attempt + 1,
                        attempts,
                        e
                    );
                    last_error = e.to_string();
                    if !is_last {
                        self.record_retry("transport");
                        tokio::time::sleep(self.policy.delay_for(attempt)).await;
                    }
                }
            }
        }

        Err(HttpClientError::Transport {
            service: self.service_name.clone(),
            attempts,
            message: last_error,
        })
    }

    fn record_retry(&self, reason: &'static str) {
        metrics::counter!(
            "hive_http_retries_total",
            "service" => self.service_name.clone(),
            "reason" => reason
        )
        .increment(1);
    }
}

fn with_headers(mut request: RequestBuilder, headers: &[(&str, &str)]) -> RequestBuilder {
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    request
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_client(max_attempts: u32) -> RetryingHttpClient {
        RetryingHttpClient::new(
            "test",
            RetryPolicy::new(max_attempts, 1),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::new(4, 100);
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(800));
    }

    #[test]
    fn test_policy_always_attempts_once() {
        assert_eq!(RetryPolicy::new(0, 10).max_attempts, 1);
    }

    #[tokio::test]
    async fn test_swarm_api_attempts_include_first_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/details")
            .with_status(500)
            .expect(2)
            .create_async()
            .await;

        let config = SwarmApiConfig {
            base_url: server.url(),
            max_attempts: 2,
            retry_delay_ms: 1,
            ..Default::default()
        };
        let client = RetryingHttpClient::for_swarm_api(&config).unwrap();
        let response = client
            .get_json(&format!("{}/details", server.url()), &[], &[])
            .await
            .unwrap();

        assert_eq!(response.status, 500);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_retries_server_errors_then_returns_last_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/details")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let client = fast_client(3);
        let response = client
            .get_json(&format!("{}/details", server.url()), &[], &[])
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert!(!response.is_success());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_does_not_retry_client_errors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/details")
            .with_status(404)
            .with_body(r#"{"success":false}"#)
            .expect(1)
            .create_async()
            .await;

        let client = fast_client(3);
        let response = client
            .get_json(&format!("{}/details", server.url()), &[], &[])
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, Some(serde_json::json!({"success": false})));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sends_headers_query_and_decodes_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/details")
            .match_query(mockito::Matcher::UrlEncoded("id".into(), "swarm7".into()))
            .match_header("x-super-token", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let client = fast_client(1);
        let response = client
            .get_json(
                &format!("{}/details", server.url()),
                &[("id", "swarm7")],
                &[("x-super-token", "secret")],
            )
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.body, Some(serde_json::json!({"success": true})));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_json_body_decodes_to_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/secrets")
            .with_status(201)
            .with_body("created")
            .create_async()
            .await;

        let client = fast_client(1);
        let response = client
            .post_json(
                &format!("{}/secrets", server.url()),
                &serde_json::json!({"secret": {"name": "A", "value": "b"}}),
                &[],
            )
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert!(response.body.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_after_all_attempts() {
        // Nothing listens on port 9 (discard) on test machines
        let client = fast_client(2);
        let err = client
            .get_json("http://127.0.0.1:9/details", &[], &[])
            .await
            .unwrap_err();

        match err {
            HttpClientError::Transport { attempts, .. } => assert_eq!(attempts, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
