// crates/newrelic-gate-core/src/error.rs
// ============================================================================
// Module: Error Taxonomy
// Description: Typed failures for REST, GraphQL, and adapter operations.
// Purpose: Make every failure attributable to exactly one error kind.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`NewRelicError`] is the only error type produced by the transports and
//! adapters. [`NewRelicError::kind`] classifies it into a stable
//! [`ErrorKind`] label that outer layers surface verbatim alongside the
//! message. Nothing is retried or swallowed on the way up.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::heuristics::is_syntax_error_message;

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Upstream API family a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiKind {
    /// REST v2 API.
    Rest,
    /// GraphQL (NerdGraph) API.
    Graphql,
}

impl ApiKind {
    /// Returns a stable label for the API family.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Graphql => "graphql",
        }
    }
}

impl fmt::Display for ApiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rest => f.write_str("REST API"),
            Self::Graphql => f.write_str("GraphQL"),
        }
    }
}

/// Stable error kind labels.
///
/// # Invariants
/// - Variants are stable for outer-layer error mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// API key missing or account id unresolvable.
    Configuration,
    /// Upstream rejected the API key.
    Auth,
    /// Non-2xx status, network failure, or undecodable body.
    Transport,
    /// Caller argument failed a local check.
    Validation,
    /// Caller did not acknowledge a destructive operation.
    Precondition,
    /// Well-formed lookup whose target does not exist.
    NotFound,
    /// GraphQL `errors[]` present.
    Query,
}

impl ErrorKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Auth => "auth",
            Self::Transport => "transport",
            Self::Validation => "validation",
            Self::Precondition => "precondition",
            Self::NotFound => "not_found",
            Self::Query => "query",
        }
    }
}

// ============================================================================
// SECTION: Error Type
// ============================================================================

/// Failures raised by transports and adapters.
///
/// # Invariants
/// - Each variant maps to exactly one [`ErrorKind`].
/// - Messages never contain the API key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewRelicError {
    /// API key absent/empty at call time, or account id unresolvable.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Upstream returned 401.
    #[error("Unauthorized: Invalid API key")]
    Unauthorized,
    /// Non-2xx status or network failure.
    #[error("{}", transport_message(*.api, *.status, .reason))]
    Transport {
        /// API family that failed.
        api: ApiKind,
        /// HTTP status, absent when no response was received.
        status: Option<u16>,
        /// Reason phrase or network failure description.
        reason: String,
        /// Best-effort capture of the failing response body.
        body: Option<String>,
    },
    /// Response body could not be decoded into the expected shape.
    #[error("malformed {api} response: {message}")]
    MalformedResponse {
        /// API family that returned the body.
        api: ApiKind,
        /// Decoding failure description.
        message: String,
    },
    /// Caller-supplied argument failed a local precondition.
    #[error("validation error: {0}")]
    Validation(String),
    /// Destructive operation invoked without explicit confirmation.
    #[error("precondition failed: {0}")]
    Precondition(String),
    /// Target entity does not exist upstream.
    #[error("not found: {0}")]
    NotFound(String),
    /// GraphQL `errors[]` present; message is the first entry.
    #[error("{}", query_message(*.syntax, .message))]
    Query {
        /// First upstream error message.
        message: String,
        /// True when the message reports a query syntax error.
        syntax: bool,
    },
}

impl NewRelicError {
    /// Returns the stable kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Unauthorized => ErrorKind::Auth,
            Self::Transport {
                ..
            }
            | Self::MalformedResponse {
                ..
            } => ErrorKind::Transport,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Precondition(_) => ErrorKind::Precondition,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Query {
                ..
            } => ErrorKind::Query,
        }
    }

    /// Builds a query error from an upstream message, flagging syntax errors.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        let message = message.into();
        let syntax = is_syntax_error_message(&message);
        Self::Query {
            message,
            syntax,
        }
    }

    /// Builds a transport error for a non-2xx status.
    #[must_use]
    pub fn status(api: ApiKind, status: u16, reason: impl Into<String>, body: Option<String>) -> Self {
        Self::Transport {
            api,
            status: Some(status),
            reason: reason.into(),
            body,
        }
    }

    /// Builds a transport error for a request that produced no response.
    #[must_use]
    pub fn network(api: ApiKind, reason: impl Into<String>) -> Self {
        Self::Transport {
            api,
            status: None,
            reason: reason.into(),
            body: None,
        }
    }

    /// Returns the HTTP status carried by the error, if any.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Transport {
                status, ..
            } => *status,
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Message Helpers
// ============================================================================

/// Renders a transport failure message.
fn transport_message(api: ApiKind, status: Option<u16>, reason: &str) -> String {
    match (api, status) {
        (ApiKind::Rest, Some(status)) => format!("REST API error: {status} {reason}"),
        (ApiKind::Graphql, Some(status)) => format!("GraphQL request failed: {status} {reason}"),
        (api, None) => format!("{api} request failed: {reason}"),
    }
}

/// Renders a GraphQL query failure message.
fn query_message(syntax: bool, message: &str) -> String {
    if syntax {
        format!("NRQL syntax error: {message}")
    } else {
        format!("GraphQL query error: {message}")
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
