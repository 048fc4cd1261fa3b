// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Session Port
//!
//! Authenticated end-user sessions as seen by request handlers. The
//! presentation layer asks a [`SessionProvider`] whether the incoming request
//! carries a valid session; it never inspects tokens itself.

use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: SessionUser,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session provider misconfigured: {0}")]
    Configuration(String),

    #[error("Session lookup failed: {0}")]
    Backend(String),
}

/// Resolves the session attached to a request, if any.
///
/// `Ok(None)` means "no valid session" (missing, expired, or forged token).
/// `Err` is reserved for provider failures and surfaces as an internal error.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError>;
}
