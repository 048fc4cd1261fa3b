// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Application Layer
//!
//! | Module | Use Case |
//! |--------|----------|
//! | [`reconcile`] | `ReconcileSwarmUseCase` / `SwarmReconciler` |
//! | [`register_swarm`] | `RegisterSwarmUseCase` |
//! | [`repository_factory`] | backend selection |

pub mod reconcile;
pub mod register_swarm;
pub mod repository_factory;

pub use reconcile::{
    MissingField, ReconcileError, ReconcileOutcome, ReconcileSwarmUseCase, ReconcileTrigger,
    SwarmReconciler,
};
pub use register_swarm::{RegisterSwarmRequest, RegisterSwarmUseCase, StandardRegisterSwarmUseCase};
