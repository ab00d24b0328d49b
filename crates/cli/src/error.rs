// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the sisamrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not logged in\n  hint: run 'sisam login' first")]
    NotAuthenticated,

    #[error("authentication rejected (http {status}): {body}\n  hint: run 'sisam login' to sign in again")]
    Auth { status: u16, body: String },

    #[error("not found (http {status}): {body}")]
    NotFound { status: u16, body: String },

    #[error("server error (http {status}): {body}")]
    Server { status: u16, body: String },

    #[error("network error: {0}\n  hint: check the api origin with 'sisam config show'")]
    Network(String),

    #[error("unexpected response from server: {0}")]
    Decode(String),

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

    #[error("{field} is required")]
    FieldRequired { field: &'static str },

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Map a non-success HTTP response to an error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Error::Auth { status, body },
            404 => Error::NotFound { status, body },
            _ => Error::Server { status, body },
        }
    }

    /// True when the server rejected the credentials or token.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth { .. })
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status, .. }
            | Error::NotFound { status, .. }
            | Error::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized Result type for sisamrs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<sisam_core::Error> for Error {
    fn from(e: sisam_core::Error) -> Self {
        match e {
            sisam_core::Error::InvalidTransition {
                from,
                to,
                valid_targets,
            } => Error::InvalidTransition {
                from,
                to,
                valid_targets,
            },
            sisam_core::Error::InvalidTheme(s) => Error::InvalidTheme(s),
            sisam_core::Error::InvalidOrigin(s) => Error::InvalidOrigin(s),
            sisam_core::Error::InvalidInput(s) => Error::Validation(s),
            sisam_core::Error::Json(e) => Error::Json(e),
        }
    }
}

impl From<crate::api::TransportError> for Error {
    fn from(e: crate::api::TransportError) -> Self {
        Error::Network(e.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
