// crates/newrelic-gate-core/src/query.rs
// ============================================================================
// Module: Query Parameters
// Description: Ordered query-parameter builder for REST requests.
// Purpose: Serialize filters without ever emitting absent or empty values.
// Dependencies: url
// ============================================================================

//! ## Overview
//! [`QueryParams`] keeps parameters in insertion order. Absent values and
//! empty collections are never recorded. Collections are comma-joined into a
//! single value unless the caller asks for the repeated `key[]=` form.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;

use url::Url;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Ordered query parameters.
///
/// # Invariants
/// - No pair carries an absent value.
/// - Empty collections contribute no pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Key/value pairs in insertion order.
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pairs: Vec::new(),
        }
    }

    /// Appends a present value.
    pub fn push(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Appends the value when present.
    pub fn push_opt<V: Display>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Appends a text filter when present and non-blank.
    pub fn push_filter(&mut self, key: impl Into<String>, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|value| !value.trim().is_empty()) {
            self.push(key, value);
        }
        self
    }

    /// Appends a collection as one comma-joined value; empty collections are omitted.
    pub fn push_joined<V: Display>(&mut self, key: impl Into<String>, values: &[V]) -> &mut Self {
        if !values.is_empty() {
            let joined = values.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
            self.push(key, joined);
        }
        self
    }

    /// Appends each element as a separate `key` pair; empty collections are omitted.
    pub fn push_repeated<V: Display>(&mut self, key: &str, values: &[V]) -> &mut Self {
        for value in values {
            self.push(key, value);
        }
        self
    }

    /// Returns true when a pair with `key` exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(name, _)| name == key)
    }

    /// Returns the first value recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
    }

    /// Returns true when no pair was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the recorded pairs in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Appends the pairs to `url` as a URL-encoded query string.
    pub fn append_to(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        let mut serializer = url.query_pairs_mut();
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions use unwrap for clarity.")]

    use proptest::prelude::*;
    use url::Url;

    use super::QueryParams;

    #[test]
    fn absent_and_empty_values_are_skipped() {
        let mut params = QueryParams::new();
        params
            .push_opt("page", None::<u32>)
            .push_filter("filter[name]", Some(""))
            .push_filter("filter[host]", None)
            .push_joined("filter[ids]", &[] as &[u64]);
        assert!(params.is_empty());
    }

    #[test]
    fn collections_join_with_commas() {
        let mut params = QueryParams::new();
        params.push_joined("filter[ids]", &[1_u64, 2, 3]);
        assert_eq!(params.get("filter[ids]"), Some("1,2,3"));
    }

    #[test]
    fn repeated_form_emits_one_pair_per_value() {
        let mut params = QueryParams::new();
        params.push_repeated("names[]", &["Apdex", "HttpDispatcher"]);
        assert_eq!(params.pairs().len(), 2);
        assert!(params.pairs().iter().all(|(key, _)| key == "names[]"));
    }

    #[test]
    fn append_to_encodes_brackets_and_keeps_order() {
        let mut url = Url::parse("https://api.newrelic.com/v2/applications.json").unwrap();
        let mut params = QueryParams::new();
        params.push_filter("filter[host]", Some("host1")).push("page", 5);
        params.append_to(&mut url);
        assert_eq!(url.query(), Some("filter%5Bhost%5D=host1&page=5"));
        let decoded: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(decoded, params.pairs().to_vec());
    }

    #[test]
    fn empty_params_leave_url_without_query() {
        let mut url = Url::parse("https://api.newrelic.com/v2/applications.json").unwrap();
        QueryParams::new().append_to(&mut url);
        assert_eq!(url.query(), None);
    }

    proptest! {
        #[test]
        fn joined_ids_never_emit_empty_value(ids in proptest::collection::vec(any::<u64>(), 0..8)) {
            let mut params = QueryParams::new();
            params.push_joined("filter[ids]", &ids);
            prop_assert_eq!(params.contains_key("filter[ids]"), !ids.is_empty());
            if let Some(value) = params.get("filter[ids]") {
                prop_assert!(!value.is_empty());
            }
        }
    }
}
