// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Swarm commands
//!
//! Commands: poll, status, register. All of them talk to a running daemon.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use crate::daemon::client::{DaemonReply, RegisterSwarmPayload};
use crate::daemon::{check_daemon_running, DaemonClient, DaemonStatus};

#[derive(Subcommand)]
pub enum SwarmCommand {
    /// Ask the daemon to reconcile a swarm with the orchestration API
    Poll {
        /// Workspace that owns the swarm (takes precedence over --swarm-id)
        #[arg(long)]
        workspace: Option<String>,

        /// Remote swarm identifier
        #[arg(long)]
        swarm_id: Option<String>,
    },

    /// Show a swarm's status (authenticated read poll)
    Status {
        /// Remote swarm identifier
        #[arg(long)]
        id: String,

        /// Session token
        #[arg(long, env = "HIVE_SESSION_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Register a pending swarm for a workspace
    Register {
        #[arg(long)]
        workspace: String,

        #[arg(long)]
        swarm_id: Option<String>,

        #[arg(long)]
        name: Option<String>,

        /// Swarm endpoint URL
        #[arg(long)]
        url: Option<String>,

        /// Placeholder API key required before polling
        #[arg(long, env = "HIVE_SWARM_PLACEHOLDER_KEY", hide_env_values = true)]
        placeholder_key: Option<String>,

        /// Session token
        #[arg(long, env = "HIVE_SESSION_TOKEN", hide_env_values = true)]
        token: String,
    },
}

pub async fn handle_command(command: SwarmCommand, host: &str, port: u16) -> Result<()> {
    match check_daemon_running(host, port).await? {
        DaemonStatus::Running { .. } => {}
        DaemonStatus::Stopped => {
            anyhow::bail!("Daemon is not running on {}:{}. Start it with `hive serve`.", host, port)
        }
        DaemonStatus::Unhealthy { error } => anyhow::bail!("Daemon is unhealthy: {}", error),
    }

    let client = DaemonClient::new(host, port)?;

    let reply = match command {
        SwarmCommand::Poll {
            workspace,
            swarm_id,
        } => {
            if workspace.is_none() && swarm_id.is_none() {
                anyhow::bail!("Provide --workspace or --swarm-id");
            }
            client
                .poll_swarm(workspace.as_deref(), swarm_id.as_deref())
                .await?
        }
        SwarmCommand::Status { id, token } => client.swarm_status(&id, &token).await?,
        SwarmCommand::Register {
            workspace,
            swarm_id,
            name,
            url,
            placeholder_key,
            token,
        } => {
            let payload = RegisterSwarmPayload {
                workspace_id: workspace,
                swarm_id,
                name,
                swarm_url: url,
                placeholder_api_key: placeholder_key,
            };
            client.register_swarm(&payload, &token).await?
        }
    };

    print_reply(&reply)
}

fn print_reply(reply: &DaemonReply) -> Result<()> {
    if !reply.is_success() {
        anyhow::bail!(
            "Daemon returned HTTP {}: {}",
            reply.status,
            reply.message().unwrap_or("no message")
        );
    }

    let success = reply
        .body
        .get("success")
        .and_then(|v| v.as_bool())
        .unwrap_or(true);
    let status = reply
        .body
        .get("status")
        .and_then(|v| v.as_str())
        .unwrap_or("UNKNOWN");

    let status = match status {
        "ACTIVE" => status.green().bold(),
        "FAILED" => status.red().bold(),
        _ => status.yellow().bold(),
    };

    match reply.message() {
        Some(message) if success => println!("{} {}", "✓".green(), message),
        Some(message) => println!("{} {}", "…".yellow(), message),
        None => {}
    }
    println!("Status: {}", status);

    let pretty = serde_json::to_string_pretty(&reply.body).context("Failed to format reply")?;
    tracing::debug!("Daemon reply: {}", pretty);

    Ok(())
}
