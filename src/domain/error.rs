//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`, or
//! `crate::application`. All error types implement `thiserror::Error` and
//! convert to `anyhow::Error` via the `?` operator. The numeric exit codes
//! attached here are part of the scripting contract and must not drift.

use thiserror::Error;

// ── Broker errors ─────────────────────────────────────────────────────────────

/// Errors raised by broker interactions, split so callers can always tell
/// "could not reach the server" apart from "the server returned an error".
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Transport-level failure: connection reset, timeout, DNS failure for
    /// the broker host itself. Exit 219.
    #[error(
        "there was a problem communicating with the server: {0}\n\
         If you were disconnected it is possible the operation finished without \
         being able to report success.\n\
         You can use 'nimbus info' and 'nimbus ctl' to learn about the status of \
         your user and application(s)."
    )]
    Transport(String),

    /// The broker answered 404 with an HTML body — wrong address or an
    /// incompatible server. Fatal, never retried. Exit 218.
    #[error(
        "Nimbus server not found. You might want to try updating your nimbus client tools."
    )]
    ServerNotFound,

    /// HTTP 401 from the broker. Exit 97.
    #[error("invalid user credentials")]
    Unauthorized,

    /// HTTP 404 from the userinfo endpoint: the login exists but has no
    /// registered domain. Exit 99.
    #[error(
        "a user with login '{login}' does not have a registered domain. \
         Register a domain before using the other nimbus tools."
    )]
    NoDomain { login: String },

    /// A decoded, structured error payload from the broker. Exits with the
    /// server-provided code, or 666 when the payload carried none.
    #[error("{detail}")]
    Server {
        exit_code: Option<i32>,
        detail: String,
    },

    /// The response body could not be decoded as the expected structure.
    /// Exit 1.
    #[error("unexpected response from server: {0}")]
    Protocol(String),
}

impl BrokerError {
    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Transport(_) => 219,
            Self::ServerNotFound => 218,
            Self::Unauthorized => 97,
            Self::NoDomain { .. } => 99,
            Self::Server { exit_code, .. } => exit_code.unwrap_or(666),
            Self::Protocol(_) => 1,
        }
    }
}

// ── Local operation errors ────────────────────────────────────────────────────

/// Local git clone failure. Carries the captured command output. Exit 216.
#[derive(Debug, Error)]
#[error("error in git clone\n{output}")]
pub struct CloneError {
    pub output: String,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Configuration file problems. Exit 253.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not open config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("could not parse config file {path}: {reason}")]
    Invalid { path: String, reason: String },
}

// ── Validation errors ─────────────────────────────────────────────────────────

/// Bad user input, caught before any network call. Exit 1.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(
        "login may not contain any of these characters: \
         (\") ($) (^) (<) (>) (|) (%) (/) (;) (:) (,) (\\) (*) (=) (~)"
    )]
    LoginForbiddenChars,

    #[error("login is required")]
    LoginRequired,

    #[error("{field} contains non-alphanumeric characters")]
    NonAlphanumeric { field: &'static str },

    #[error("maximum {field} size is {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} is required")]
    Required { field: &'static str },
}

// ── Exit code mapping ─────────────────────────────────────────────────────────

/// Map an error chain to its documented process exit status.
///
/// Scripting contract: 0 success (incl. DNS-timeout soft-success),
/// 1 generic/server error, 97 invalid credentials, 99 no registered domain,
/// 216 clone failed, 218 server not found, 219 transport failure,
/// 253 config unreadable, 666 undecodable error response.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(broker) = err.downcast_ref::<BrokerError>() {
        return broker.exit_code();
    }
    if err.downcast_ref::<CloneError>().is_some() {
        return 216;
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return 253;
    }
    1
}

// ── Unit tests ────────────────────────────────────────────────────────────────
