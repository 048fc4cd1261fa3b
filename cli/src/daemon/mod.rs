// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Daemon mode implementation
//!
//! Handles:
//! - HTTP server wiring and graceful shutdown
//! - HTTP client used by CLI commands to reach a running daemon
//! - HTTP health checks

use std::time::Duration;

pub mod client;
pub mod server;

pub use client::DaemonClient;
pub use server::{start_daemon, ServeOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonStatus {
    Running { uptime: Option<u64> },
    Stopped,
    Unhealthy { error: String },
}

/// Check whether a daemon answers `/health` on the given address
pub async fn check_daemon_running(host: &str, port: u16) -> anyhow::Result<DaemonStatus> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(500))
        .build()?;

    let health_url = format!("{}/health", base_url(host, port));

    match client.get(&health_url).send().await {
        Ok(response) if response.status().is_success() => {
            let uptime = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body.get("uptime_seconds").and_then(|v| v.as_u64()));
            Ok(DaemonStatus::Running { uptime })
        }
        Ok(response) => Ok(DaemonStatus::Unhealthy {
            error: format!("health check returned HTTP {}", response.status()),
        }),
        Err(_) => Ok(DaemonStatus::Stopped),
    }
}

pub(crate) fn base_url(host: &str, port: u16) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}:{}", host.trim_end_matches('/'), port)
    } else {
        format!("http://{}:{}", host, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        assert_eq!(base_url("127.0.0.1", 8000), "http://127.0.0.1:8000");
        assert_eq!(base_url("https://hive.example", 443), "https://hive.example:443");
    }

    #[tokio::test]
    async fn test_health_check_against_mock_daemon() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"healthy","uptime_seconds":42}"#)
            .create_async()
            .await;

        let (host, port) = split_mock_url(&server.url());
        assert_eq!(
            check_daemon_running(&host, port).await.unwrap(),
            DaemonStatus::Running { uptime: Some(42) }
        );
    }

    #[tokio::test]
    async fn test_health_check_stopped() {
        assert_eq!(
            check_daemon_running("127.0.0.1", 9).await.unwrap(),
            DaemonStatus::Stopped
        );
    }

    fn split_mock_url(url: &str) -> (String, u16) {
        let (host, port) = url.rsplit_once(':').unwrap();
        (host.to_string(), port.parse().unwrap())
    }
}
