// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use hive_core::domain::hive_config::HiveConfigManifest;

const TEMPLATE: &str = include_str!("../../templates/hive-config.yaml");

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path
        #[arg(short, long, default_value = "./hive-config.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate { output, force } => generate(output, force),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let manifest = HiveConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. HIVE_CONFIG_PATH: {}",
            std::env::var("HIVE_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./hive-config.yaml");
        println!("  4. ~/.hive/config.yaml");
        println!("  5. /etc/hive/config.yaml");
        println!();
    }

    let spec = &manifest.spec;
    let set_or_not = |value: bool| if value { "(set)".green() } else { "(not set)".dimmed() };

    println!("{} {}", "Deployment:".bold(), manifest.metadata.name);
    println!();

    println!("{}", "Server:".bold());
    println!("  Bind: {}:{}", spec.server.bind_address, spec.server.port);
    println!();

    println!("{}", "Storage:".bold());
    match &spec.database.url {
        Some(_) => println!(
            "  PostgreSQL (max {} connections)",
            spec.database.max_connections
        ),
        None => println!("  In-memory"),
    }
    println!();

    println!("{}", "Swarm API:".bold());
    println!("  Base URL: {}", spec.swarm_api.base_url);
    println!(
        "  Super-admin key: {}",
        set_or_not(spec.swarm_api.super_admin_key.is_some())
    );
    println!(
        "  Attempts: {} (base delay {}ms, timeout {}ms)",
        spec.swarm_api.max_attempts, spec.swarm_api.retry_delay_ms, spec.swarm_api.timeout_ms
    );
    println!();

    println!("{}", "Stakwork:".bold());
    match &spec.stakwork {
        Some(stakwork) => {
            println!("  Base URL: {}", stakwork.base_url);
            println!("  API key: {}", set_or_not(stakwork.api_key.is_some()));
        }
        None => println!("  {}", "(not configured)".dimmed()),
    }
    println!();

    println!("{}", "Auth:".bold());
    println!(
        "  Session secret: {}",
        set_or_not(spec.auth.session_secret.is_some())
    );
    println!();

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let manifest =
        HiveConfigManifest::load_or_default(config_path).context("Failed to load configuration")?;

    manifest
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    std::fs::write(&output, TEMPLATE)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_and_validates() {
        let manifest = HiveConfigManifest::from_yaml_str(TEMPLATE).unwrap();
        manifest.validate().unwrap();
        assert!(manifest.spec.database.url.is_none());
        assert!(manifest.spec.stakwork.is_some());
    }

    #[test]
    fn test_generate_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hive-config.yaml");

        generate(path.clone(), false).unwrap();
        assert!(generate(path.clone(), false).is_err());
        generate(path.clone(), true).unwrap();

        assert!(HiveConfigManifest::from_yaml_file(&path).is_ok());
    }
}
