// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod db;
pub mod http_client;
pub mod session;
pub mod stakwork;

pub use http_client::{HttpClientError, HttpResponse, RetryPolicy, RetryingHttpClient};
