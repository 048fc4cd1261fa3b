// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP client for communicating with daemon API

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::base_url;

/// Status code and JSON body of a daemon reply. Non-2xx replies are not
/// errors here: the body carries the daemon's `message`.
#[derive(Debug, Clone, PartialEq)]
pub struct DaemonReply {
    pub status: u16,
    pub body: Value,
}

impl DaemonReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSwarmPayload {
    pub workspace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swarm_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swarm_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DaemonClient {
    client: Client,
    base_url: String,
}

impl DaemonClient {
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url(host, port),
        })
    }

    /// Operator-triggered poll by workspace and/or swarm id
    pub async fn poll_swarm(
        &self,
        workspace_id: Option<&str>,
        swarm_id: Option<&str>,
    ) -> Result<DaemonReply> {
        let mut body = serde_json::Map::new();
        if let Some(workspace_id) = workspace_id {
            body.insert("workspaceId".into(), Value::from(workspace_id));
        }
        if let Some(swarm_id) = swarm_id {
            body.insert("swarmId".into(), Value::from(swarm_id));
        }

        let response = self
            .client
            .post(format!("{}/api/swarm/poll", self.base_url))
            .json(&body)
            .send()
            .await
            .context("Failed to poll swarm")?;

        into_reply(response).await
    }

    /// Read-triggered poll by swarm id, authenticated with a session token
    pub async fn swarm_status(&self, swarm_id: &str, token: &str) -> Result<DaemonReply> {
        let response = self
            .client
            .get(format!("{}/api/swarm/poll", self.base_url))
            .query(&[("id", swarm_id)])
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to get swarm status")?;

        into_reply(response).await
    }

    pub async fn register_swarm(
        &self,
        payload: &RegisterSwarmPayload,
        token: &str,
    ) -> Result<DaemonReply> {
        let response = self
            .client
            .post(format!("{}/api/swarm", self.base_url))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .context("Failed to register swarm")?;

        into_reply(response).await
    }
}

async fn into_reply(response: Response) -> Result<DaemonReply> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .context("Failed to read daemon response")?;

    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    Ok(DaemonReply { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> DaemonClient {
        let (host, port) = server.url().rsplit_once(':').map(|(h, p)| (h.to_string(), p.to_string())).unwrap();
        DaemonClient::new(&host, port.parse().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_poll_swarm_sends_camel_case_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/swarm/poll")
            .match_body(Matcher::Json(json!({ "workspaceId": "ws-1" })))
            .with_status(200)
            .with_body(r#"{"success":false,"message":"Swarm is not yet active","status":"PENDING"}"#)
            .create_async()
            .await;

        let reply = client_for(&server).poll_swarm(Some("ws-1"), None).await.unwrap();

        assert!(reply.is_success());
        assert_eq!(reply.message(), Some("Swarm is not yet active"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_swarm_status_sends_bearer_and_keeps_error_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/swarm/poll")
            .match_query(Matcher::UrlEncoded("id".into(), "swarm42".into()))
            .match_header("authorization", "Bearer t0k")
            .with_status(404)
            .with_body(r#"{"success":false,"message":"Swarm not found"}"#)
            .create_async()
            .await;

        let reply = client_for(&server).swarm_status("swarm42", "t0k").await.unwrap();

        assert_eq!(reply.status, 404);
        assert_eq!(reply.message(), Some("Swarm not found"));
    }
}
