// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Stakwork commands
//!
//! Commands: customer, secret. These call Stakwork directly with the
//! credentials from `spec.stakwork`; no daemon is needed.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use hive_core::domain::hive_config::HiveConfigManifest;
use hive_core::infrastructure::stakwork::{secret_name_from_alias, StakworkClient};

#[derive(Subcommand)]
pub enum StakworkCommand {
    /// Create a Stakwork customer
    Customer {
        #[arg(long)]
        name: String,
    },

    /// Create a Stakwork secret
    Secret {
        /// Secret name
        #[arg(long, conflicts_with = "from_alias", required_unless_present = "from_alias")]
        name: Option<String>,

        /// Name the secret after a credential alias such as {{SWARM_42_API_KEY}}
        #[arg(long)]
        from_alias: Option<String>,

        /// Secret value
        #[arg(long, env = "HIVE_STAKWORK_SECRET_VALUE", hide_env_values = true)]
        value: String,
    },
}

pub async fn handle_command(command: StakworkCommand, config_path: Option<PathBuf>) -> Result<()> {
    let manifest =
        HiveConfigManifest::load_or_default(config_path).context("Failed to load configuration")?;
    let stakwork = manifest
        .spec
        .stakwork
        .context("Stakwork is not configured (spec.stakwork)")?;
    let client = StakworkClient::from_config(&stakwork)?;

    match command {
        StakworkCommand::Customer { name } => {
            let response = client.create_customer(&name).await?;
            println!("{}", format!("✓ Customer '{}' created", name).green());
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        StakworkCommand::Secret {
            name,
            from_alias,
            value,
        } => {
            let name = secret_name(name, from_alias)?;
            client.create_secret(&name, &value).await?;
            println!("{}", format!("✓ Secret '{}' created", name).green());
        }
    }

    Ok(())
}

fn secret_name(name: Option<String>, from_alias: Option<String>) -> Result<String> {
    match (name, from_alias) {
        (Some(name), _) => Ok(name),
        (None, Some(alias)) => {
            let name = secret_name_from_alias(&alias);
            if name.is_empty() {
                anyhow::bail!("Alias '{}' does not name a secret", alias);
            }
            Ok(name.to_string())
        }
        (None, None) => anyhow::bail!("Provide --name or --from-alias"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_name_resolution() {
        assert_eq!(
            secret_name(None, Some("{{SWARM_42_API_KEY}}".into())).unwrap(),
            "SWARM_42_API_KEY"
        );
        assert_eq!(secret_name(Some("X".into()), None).unwrap(), "X");
        assert!(secret_name(None, Some("{{}}".into())).is_err());
        assert!(secret_name(None, None).is_err());
    }
}
