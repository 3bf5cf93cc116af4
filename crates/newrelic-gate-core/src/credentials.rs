// crates/newrelic-gate-core/src/credentials.rs
// ============================================================================
// Module: Credentials
// Description: API key and default account id for one client instance.
// Purpose: Defer credential failures to call time with typed errors.
// Dependencies: crate::error
// ============================================================================

//! ## Overview
//! Credentials are immutable once built. A missing or empty API key is not a
//! construction error; it surfaces as [`NewRelicError::Configuration`] when a
//! call needs the key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::error::NewRelicError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// API key plus optional default account id.
///
/// # Invariants
/// - `Debug` output never includes the API key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// User API key.
    api_key: Option<String>,
    /// Account used when a call does not name one.
    default_account_id: Option<String>,
}

impl Credentials {
    /// Builds credentials from optional parts.
    #[must_use]
    pub const fn new(api_key: Option<String>, default_account_id: Option<String>) -> Self {
        Self {
            api_key,
            default_account_id,
        }
    }

    /// Returns the API key.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::Configuration`] when the key is absent or blank.
    pub fn api_key(&self) -> Result<&str, NewRelicError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(NewRelicError::Configuration("New Relic API key is not configured".to_string())),
        }
    }

    /// Returns true when a non-blank API key is present.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_ok()
    }

    /// Returns the default account id, if configured.
    #[must_use]
    pub fn default_account_id(&self) -> Option<&str> {
        self.default_account_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Picks the explicit account id, falling back to the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::Configuration`] when neither is present.
    pub fn resolve_account_id(&self, explicit: Option<&str>) -> Result<String, NewRelicError> {
        explicit
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .or_else(|| self.default_account_id())
            .map(ToString::to_string)
            .ok_or_else(|| {
                NewRelicError::Configuration(
                    "account id is required: pass one or configure a default".to_string(),
                )
            })
    }

    /// Returns credentials where each present field of `overrides` wins.
    #[must_use]
    pub fn merged_with(&self, overrides: &Self) -> Self {
        Self {
            api_key: overrides.api_key.clone().or_else(|| self.api_key.clone()),
            default_account_id: overrides
                .default_account_id
                .clone()
                .or_else(|| self.default_account_id.clone()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("default_account_id", &self.default_account_id)
            .finish()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
