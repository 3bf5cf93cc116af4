// crates/newrelic-gate-core/src/region.rs
// ============================================================================
// Module: Region Resolver
// Description: Maps a region token to REST and GraphQL base URLs.
// Purpose: Route every upstream call to the data-center host of the account.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! New Relic accounts live in either the US or the EU data center. The region
//! token is case-insensitive and resolution is total: anything other than
//! `EU` selects the US hosts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// REST v2 base URL for US accounts.
pub const US_REST_BASE_URL: &str = "https://api.newrelic.com/v2";
/// GraphQL base URL for US accounts.
pub const US_GRAPHQL_BASE_URL: &str = "https://api.newrelic.com";
/// REST v2 base URL for EU accounts.
pub const EU_REST_BASE_URL: &str = "https://api.eu.newrelic.com/v2";
/// GraphQL base URL for EU accounts.
pub const EU_GRAPHQL_BASE_URL: &str = "https://api.eu.newrelic.com";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Data-center region of a New Relic account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Region {
    /// United States data center (default).
    #[default]
    Us,
    /// European Union data center.
    Eu,
}

impl Region {
    /// Resolves a region token. Absent or unrecognized tokens select [`Region::Us`].
    #[must_use]
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some(value) if value.trim().eq_ignore_ascii_case("eu") => Self::Eu,
            _ => Self::Us,
        }
    }

    /// Returns the canonical token for the region.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Eu => "EU",
        }
    }

    /// Returns the base URLs serving this region.
    #[must_use]
    pub fn endpoints(self) -> RegionEndpoints {
        match self {
            Self::Us => RegionEndpoints::new(US_REST_BASE_URL, US_GRAPHQL_BASE_URL),
            Self::Eu => RegionEndpoints::new(EU_REST_BASE_URL, EU_GRAPHQL_BASE_URL),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = Option::<String>::deserialize(deserializer)?;
        Ok(Self::parse(token.as_deref()))
    }
}

/// Base URLs for one region.
///
/// # Invariants
/// - Neither URL carries a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEndpoints {
    /// REST v2 base URL; resource paths are appended verbatim.
    pub rest_base_url: String,
    /// GraphQL base URL; the endpoint is `{graphql_base_url}/graphql`.
    pub graphql_base_url: String,
}

impl RegionEndpoints {
    /// Builds endpoints from explicit base URLs, trimming trailing slashes.
    #[must_use]
    pub fn new(rest_base_url: impl Into<String>, graphql_base_url: impl Into<String>) -> Self {
        Self {
            rest_base_url: trim_trailing_slash(rest_base_url.into()),
            graphql_base_url: trim_trailing_slash(graphql_base_url.into()),
        }
    }

    /// Returns the GraphQL endpoint URL.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!("{}/graphql", self.graphql_base_url)
    }
}

/// Strips trailing `/` characters from a base URL.
fn trim_trailing_slash(mut value: String) -> String {
    while value.ends_with('/') {
        value.pop();
    }
    value
}

// ============================================================================
// SECTION: Tests
// ============================================================================
