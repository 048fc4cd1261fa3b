// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `hive-core`: Shared Kernel
//!
//! Configuration, persistence primitives, outbound HTTP, sessions and the
//! common HTTP surface used by every Hive bounded context.
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | `HiveConfig`, `RepositoryError`, `SessionProvider` |
//! | [`infrastructure`] | Infrastructure | PostgreSQL pool, retrying HTTP client, JWT sessions, Stakwork |
//! | [`presentation`] | Presentation | `/health`, `AuthSession` extractor |

pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
