// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`hive-core`)
//!
//! HTTP building blocks shared by every bounded context's routes. **No
//! business logic lives here.**
//!
//! | Module | Transport | Description |
//! |--------|-----------|-------------|
//! | [`api`] | HTTP (Axum) | `/health`, session guard, JSON error envelope |

pub mod api;
