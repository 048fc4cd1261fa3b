// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Presentation Layer
//!
//! | Module | Transport | Description |
//! |--------|-----------|-------------|
//! | [`api`] | HTTP (Axum) | `/api/swarm/poll` (both entry points), `/api/swarm` |

pub mod api;

pub use api::{swarm_routes, SwarmApiState};
