// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Domain Layer
//!
//! | Module | Key Types |
//! |--------|-----------|
//! | [`swarm`] | `SwarmRecord`, `SwarmStatus`, `SwarmLookup`, `Credential` |
//! | [`alias`] | `derive_alias` |
//! | [`repository`] | `SwarmRepository` port |
//! | [`remote`] | `SwarmStatusFetcher` port, `FetchOutcome` |

pub mod alias;
pub mod remote;
pub mod repository;
pub mod swarm;

pub use alias::derive_alias;
pub use remote::{FetchError, FetchOutcome, SwarmDetails, SwarmStatusFetcher};
pub use repository::SwarmRepository;
pub use swarm::{
    Credential, LookupKey, SwarmId, SwarmLookup, SwarmRecord, SwarmRecordId, SwarmStatus,
    SwarmUpdate, WorkspaceKey,
};
