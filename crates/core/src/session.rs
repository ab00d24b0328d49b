// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session identity and the authentication state machine.
//!
//! ```text
//!              Login                 Succeeded
//! Anonymous ─────────► Authenticating ─────────► Authenticated
//!     ▲                   │      ▲                    │
//!     │            Failed │      │ Retry              │ Logout / Rejected
//!     │                   ▼      │                    │
//!     └─── Acknowledge ── AuthenticationFailed        │
//!     ▲                                               │
//!     └───────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where the client stands with respect to authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No credentials. Initial state without a persisted token.
    #[default]
    Anonymous,
    /// Login request in flight.
    Authenticating,
    /// Token held; background refresh running.
    Authenticated,
    /// Last login attempt was rejected; waiting for retry or acknowledgement.
    AuthenticationFailed,
}

/// Inputs that drive [`SessionState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Credentials submitted.
    Login,
    /// Server accepted the credentials.
    Succeeded,
    /// Server rejected the credentials or the request failed.
    Failed,
    /// Credentials resubmitted after a failure.
    Retry,
    /// User dismissed a failed login.
    Acknowledge,
    /// User logged out.
    Logout,
    /// Server rejected the stored token on some later request.
    Rejected,
}

impl SessionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEvent::Login => "login",
            SessionEvent::Succeeded => "succeeded",
            SessionEvent::Failed => "failed",
            SessionEvent::Retry => "retry",
            SessionEvent::Acknowledge => "acknowledge",
            SessionEvent::Logout => "logout",
            SessionEvent::Rejected => "rejected",
        }
    }

    /// The state this event leads to when it is valid.
    pub fn target(&self) -> SessionState {
        match self {
            SessionEvent::Login | SessionEvent::Retry => SessionState::Authenticating,
            SessionEvent::Succeeded => SessionState::Authenticated,
            SessionEvent::Failed => SessionState::AuthenticationFailed,
            SessionEvent::Acknowledge | SessionEvent::Logout | SessionEvent::Rejected => {
                SessionState::Anonymous
            }
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SessionState {
    /// Returns the string representation used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticating => "authenticating",
            SessionState::Authenticated => "authenticated",
            SessionState::AuthenticationFailed => "authentication_failed",
        }
    }

    /// Check whether `event` is accepted in this state.
    pub fn accepts(&self, event: SessionEvent) -> bool {
        use SessionEvent as E;
        use SessionState as S;

        matches!(
            (self, event),
            (S::Anonymous, E::Login)
                | (S::Authenticating, E::Succeeded | E::Failed)
                | (S::AuthenticationFailed, E::Retry | E::Acknowledge)
                | (S::Authenticated, E::Logout | E::Rejected)
        )
    }

    /// Apply `event`, returning the next state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] when the event is not accepted.
    pub fn transition(self, event: SessionEvent) -> Result<SessionState> {
        if self.accepts(event) {
            Ok(event.target())
        } else {
            Err(Error::InvalidTransition {
                from: self.as_str().to_string(),
                to: event.target().as_str().to_string(),
                valid_targets: self.valid_events(),
            })
        }
    }

    /// Events accepted in this state, formatted for hints.
    pub fn valid_events(&self) -> String {
        match self {
            SessionState::Anonymous => "authenticating (login)".to_string(),
            SessionState::Authenticating => {
                "authenticated (succeeded), authentication_failed (failed)".to_string()
            }
            SessionState::Authenticated => "anonymous (logout)".to_string(),
            SessionState::AuthenticationFailed => {
                "authenticating (retry), anonymous (acknowledge)".to_string()
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        *self == SessionState::Authenticated
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of the current client.
///
/// Values are immutable; a login or logout produces a new `Session`.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub username: Option<String>,
    pub token: Option<String>,
}

impl Session {
    /// A session with no credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session holding `token` for `username`.
    pub fn authenticated(token: impl Into<String>, username: Option<String>) -> Self {
        Session {
            username,
            token: Some(token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
