// crates/newrelic-gate-core/src/response.rs
// ============================================================================
// Module: Response Envelopes
// Description: REST response record and GraphQL `{data, errors}` envelope.
// Purpose: Carry upstream results without silent coercion.
// Dependencies: serde, serde_json, crate::links, crate::error
// ============================================================================

//! ## Overview
//! [`RestResponse`] records the literal HTTP status, decoded body, final
//! request URL, and parsed `Link` relations of one REST call.
//! [`GraphqlEnvelope`] is the raw GraphQL body; a non-empty `errors` list
//! is a failure even when `data` is also present.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiKind;
use crate::error::NewRelicError;
use crate::links::LinkRelations;

// ============================================================================
// SECTION: REST
// ============================================================================

/// Result of one REST call.
///
/// # Invariants
/// - `status` is the literal HTTP status of the response.
/// - `url` is the final request URL, including the query string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestResponse<T> {
    /// HTTP status code.
    pub status: u16,
    /// Decoded response body.
    pub data: T,
    /// Final request URL.
    pub url: String,
    /// Relations parsed from the `Link` header.
    pub links: LinkRelations,
}

impl<T> RestResponse<T> {
    /// Transforms the body while keeping status, URL, and links.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RestResponse<U> {
        RestResponse {
            status: self.status,
            data: f(self.data),
            url: self.url,
            links: self.links,
        }
    }

    /// Transforms the body with a fallible function.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`.
    pub fn try_map<U>(
        self,
        f: impl FnOnce(T) -> Result<U, NewRelicError>,
    ) -> Result<RestResponse<U>, NewRelicError> {
        Ok(RestResponse {
            status: self.status,
            data: f(self.data)?,
            url: self.url,
            links: self.links,
        })
    }
}

impl RestResponse<Value> {
    /// Extracts the array stored under `key` in the body as typed items.
    ///
    /// A missing or `null` key yields no items.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::MalformedResponse`] when the value is not an
    /// array of `T`.
    pub fn into_items<T: DeserializeOwned>(self, key: &str) -> Result<RestResponse<Vec<T>>, NewRelicError> {
        self.try_map(|mut data| {
            let items = data.get_mut(key).map(Value::take).unwrap_or(Value::Null);
            if items.is_null() {
                return Ok(Vec::new());
            }
            serde_json::from_value(items).map_err(|err| NewRelicError::MalformedResponse {
                api: ApiKind::Rest,
                message: format!("`{key}` is not a list of records: {err}"),
            })
        })
    }
}

// ============================================================================
// SECTION: GraphQL
// ============================================================================

/// One entry of a GraphQL `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlErrorEntry {
    /// Human-readable error message.
    pub message: String,
    /// Remaining fields (`locations`, `path`, `extensions`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Raw GraphQL response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphqlEnvelope<T> {
    /// Response data.
    #[serde(default)]
    pub data: Option<T>,
    /// Application-level errors.
    #[serde(default)]
    pub errors: Option<Vec<GraphqlErrorEntry>>,
}

impl<T> GraphqlEnvelope<T> {
    /// Returns the first error entry, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&GraphqlErrorEntry> {
        self.errors.as_deref().and_then(<[GraphqlErrorEntry]>::first)
    }

    /// Returns true when a non-empty `errors` list is present.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.first_error().is_some()
    }

    /// Fails on the first error, otherwise returns `data`.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::Query`] carrying the first error message, or
    /// [`NewRelicError::MalformedResponse`] when `data` is absent.
    pub fn into_data(self) -> Result<T, NewRelicError> {
        if let Some(first) = self.first_error() {
            return Err(NewRelicError::query(first.message.clone()));
        }
        self.data.ok_or_else(|| NewRelicError::MalformedResponse {
            api: ApiKind::Graphql,
            message: "response carried neither data nor errors".to_string(),
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
