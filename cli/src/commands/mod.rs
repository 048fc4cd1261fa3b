// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Hive CLI

pub mod config;
pub mod stakwork;
pub mod swarm;
pub mod update;

pub use self::config::ConfigCommand;
pub use self::stakwork::StakworkCommand;
pub use self::swarm::SwarmCommand;
pub use self::update::UpdateCommand;
