// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Credential alias derivation.
//!
//! A swarm's API key is stored as a secret elsewhere and referenced through an
//! alias of the form `{{SWARM_<N>_API_KEY}}`, where `<N>` is the first run of
//! decimal digits in the swarm identifier, or the whole identifier when it has
//! none.

use regex::Regex;
use std::sync::LazyLock;

// ASCII only: `\d` would also match other Unicode digit classes
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit run regex"));

/// Total over any input, including the empty string.
pub fn derive_alias(resource_id: &str) -> String {
    let token = DIGIT_RUN
        .find(resource_id)
        .map(|m| m.as_str())
        .unwrap_or(resource_id);
    format!("{{{{SWARM_{}_API_KEY}}}}", token)
}
