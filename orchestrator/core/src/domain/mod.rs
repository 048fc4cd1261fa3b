// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Core Domain Layer
//!
//! Pure configuration and port types shared by every bounded context.
//!
//! | Module | Key Types |
//! |--------|-----------|
//! | [`hive_config`] | `HiveConfigManifest`, `HiveConfig` |
//! | [`repository`] | `StorageBackend`, `RepositoryError` |
//! | [`session`] | `Session`, `SessionProvider` |

pub mod hive_config;
pub mod repository;
pub mod session;
