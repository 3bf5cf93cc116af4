// crates/newrelic-gate-client/src/settings.rs
// ============================================================================
// Module: HTTP Settings
// Description: Outbound HTTP client settings shared by both transports.
// Purpose: Build one pooled reqwest client and bound diagnostic captures.
// Dependencies: reqwest, newrelic-gate-core
// ============================================================================

//! ## Overview
//! A single [`reqwest::Client`] is built from [`HttpSettings`] and shared by
//! every per-call client so connection pools survive across tool calls.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use newrelic_gate_core::NewRelicError;
use reqwest::Client;
use reqwest::redirect::Policy;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = concat!("newrelic-gate/", env!("CARGO_PKG_VERSION"));
/// Default cap on captured error bodies, in bytes.
pub const DEFAULT_MAX_ERROR_BODY_BYTES: usize = 4096;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Settings for the shared HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
    /// Maximum bytes of a failing response body kept for diagnostics.
    pub max_error_body_bytes: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_error_body_bytes: DEFAULT_MAX_ERROR_BODY_BYTES,
        }
    }
}

impl HttpSettings {
    /// Builds the shared HTTP client.
    ///
    /// Redirects are not followed, so the `Api-Key` header only reaches the
    /// configured hosts.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::Configuration`] when the client cannot be built.
    pub fn build_client(&self) -> Result<Client, NewRelicError> {
        Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .user_agent(self.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|_| NewRelicError::Configuration("http client build failed".to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders at most `limit` bytes of a response body as lossy UTF-8.
pub(crate) fn truncate_body(bytes: &[u8], limit: usize) -> String {
    let mut body = String::from_utf8_lossy(bytes).into_owned();
    if body.len() > limit {
        let mut cut = limit;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}

// ============================================================================
// SECTION: Tests
// ============================================================================
