// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `hive-swarm`: Swarm Provisioning Context
//!
//! Tracks the swarm provisioned for each workspace by the third-party
//! orchestration API and reconciles local state with the remote truth.
//!
//! ## Crate Layout
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | `SwarmRecord` aggregate, `derive_alias`, repository and fetcher ports |
//! | [`application`] | Application | `SwarmReconciler`, `RegisterSwarmUseCase`, repository factory |
//! | [`infrastructure`] | Infrastructure | In-memory / PostgreSQL repositories, HTTP status fetcher |
//! | [`presentation`] | Presentation | Axum routes under `/api/swarm` |
//!
//! ## Key Concepts
//!
//! - **Reconciliation**: one pass asks the remote API whether a PENDING swarm
//!   is ready and, if so, stores its API key and credential alias and marks
//!   it ACTIVE. ACTIVE swarms are never polled again.
//! - **Credential alias**: `{{SWARM_<N>_API_KEY}}`, a reference to the secret
//!   used by downstream configuration instead of the key itself.
//! - **Entry points**: the operator poll (by workspace or swarm id, no
//!   session, placeholder key required) and the read poll (by swarm id,
//!   session required).

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
