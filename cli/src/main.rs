// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Hive CLI
//!
//! The `hive` binary runs the swarm provisioning daemon and talks to it.
//!
//! ## Commands
//!
//! - `hive serve` - Run the HTTP daemon
//! - `hive swarm poll|status|register` - Swarm operations against a running daemon
//! - `hive stakwork customer|secret` - Stakwork provisioning helpers
//! - `hive config show|validate|generate` - Configuration management
//! - `hive update` - Apply database migrations

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use hive_cli::commands::{self, ConfigCommand, StakworkCommand, SwarmCommand};
use hive_cli::daemon::{self, ServeOptions};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

/// Hive - swarm provisioning service
#[derive(Parser)]
#[command(name = "hive")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "HIVE_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// HTTP API port (default: from config, else 8000)
    #[arg(long, global = true, env = "HIVE_PORT")]
    port: Option<u16>,

    /// HTTP API host (default: from config, else 127.0.0.1)
    #[arg(long, global = true, env = "HIVE_HOST")]
    host: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "HIVE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP daemon
    #[command(name = "serve")]
    Serve,

    /// Swarm operations
    #[command(name = "swarm")]
    Swarm {
        #[command(subcommand)]
        command: SwarmCommand,
    },

    /// Stakwork provisioning helpers
    #[command(name = "stakwork")]
    Stakwork {
        #[command(subcommand)]
        command: StakworkCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Update Hive database
    #[command(name = "update")]
    Update {
        #[command(flatten)]
        command: commands::UpdateCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    let host = cli.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = cli.port.unwrap_or(DEFAULT_PORT);

    match cli.command {
        Some(Commands::Serve) => {
            info!("Starting Hive daemon");
            daemon::start_daemon(ServeOptions {
                config_path: cli.config,
                host: cli.host,
                port: cli.port,
            })
            .await
        }
        Some(Commands::Swarm { command }) => {
            commands::swarm::handle_command(command, &host, port).await
        }
        Some(Commands::Stakwork { command }) => {
            commands::stakwork::handle_command(command, cli.config).await
        }
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Update { command }) => commands::update::execute(command, cli.config).await,
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
