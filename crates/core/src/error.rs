// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for sisam-core operations.

use thiserror::Error;

/// All possible errors that can occur in sisam-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid session transition: cannot go from {from} to {to}\n  hint: from '{from}' you can go to: {valid_targets}")]
    InvalidTransition {
        from: String,
        to: String,
        valid_targets: String,
    },

    #[error("invalid theme: '{0}'\n  hint: valid themes are: dark, light")]
    InvalidTheme(String),

    #[error("invalid api origin '{0}': must be an absolute http:// or https:// URL")]
    InvalidOrigin(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for sisam-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
