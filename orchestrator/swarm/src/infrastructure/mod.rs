// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Infrastructure Layer
//!
//! | Module | Adapter |
//! |--------|---------|
//! | [`repositories`] | In-memory and PostgreSQL `SwarmRepository` |
//! | [`swarm_api`] | HTTP `SwarmStatusFetcher` |

pub mod repositories;
pub mod swarm_api;

pub use swarm_api::{HttpSwarmStatusFetcher, SwarmApiError};
