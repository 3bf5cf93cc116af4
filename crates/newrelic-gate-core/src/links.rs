// crates/newrelic-gate-core/src/links.rs
// ============================================================================
// Module: Link Relations
// Description: RFC 5988 `Link` header parsing into named relation URLs.
// Purpose: Expose continuation URLs (`next`, `last`, ...) to the pager.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A `Link` header carries zero or more `<url>; rel="token"` segments
//! separated by commas. Commas inside `<...>` or a quoted parameter belong
//! to the segment, so URLs such as `?filter[ids]=1,2` survive. Segments without a bracketed URL or a `rel`
//! parameter are skipped; parsing never fails.
//!
//! Invariants:
//! - Relation tokens are stored lowercase.
//! - When a token repeats, the first segment wins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Mapping from relation token to absolute URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkRelations(BTreeMap<String, String>);

impl LinkRelations {
    /// Parses an optional `Link` header value. An absent header yields no relations.
    #[must_use]
    pub fn parse(header: Option<&str>) -> Self {
        let mut relations = BTreeMap::new();
        for segment in split_segments(header.unwrap_or_default()) {
            let Some((url, rels)) = parse_segment(segment) else {
                continue;
            };
            for rel in rels {
                relations.entry(rel).or_insert_with(|| url.clone());
            }
        }
        Self(relations)
    }

    /// Returns the URL for a relation token.
    #[must_use]
    pub fn get(&self, rel: &str) -> Option<&str> {
        self.0.get(&rel.to_ascii_lowercase()).map(String::as_str)
    }

    /// Returns the `next` relation URL.
    #[must_use]
    pub fn next(&self) -> Option<&str> {
        self.get("next")
    }

    /// Returns true when no relation was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of parsed relations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates relations in token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(rel, url)| (rel.as_str(), url.as_str()))
    }
}

// ============================================================================
// SECTION: Parsing Helpers
// ============================================================================

/// Splits a header on commas outside angle brackets and double quotes.
///
/// A `<` inside an unclosed `<...>` starts a new segment at the last comma,
/// so one missing `>` cannot swallow the following segments.
fn split_segments(header: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_url = false;
    let mut in_quotes = false;
    let mut comma_in_url: Option<usize> = None;
    for (index, ch) in header.char_indices() {
        match ch {
            '<' if in_url => {
                if let Some(comma) = comma_in_url.take() {
                    segments.push(&header[start..comma]);
                    start = comma + 1;
                }
            }
            '<' if !in_quotes => in_url = true,
            '>' if in_url => {
                in_url = false;
                comma_in_url = None;
            }
            ',' if in_url => comma_in_url = Some(index),
            '"' if !in_url => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                segments.push(&header[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    if let Some(comma) = comma_in_url {
        segments.push(&header[start..comma]);
        start = comma + 1;
    }
    segments.push(&header[start..]);
    segments
}

/// Parses one `<url>; param; rel="a b"` segment into its URL and relation tokens.
fn parse_segment(segment: &str) -> Option<(String, Vec<String>)> {
    let segment = segment.trim();
    let rest = segment.strip_prefix('<')?;
    let close = rest.find('>')?;
    let url = rest[..close].trim();
    if url.is_empty() {
        return None;
    }
    let rels: Vec<String> = rest[close + 1..]
        .split(';')
        .filter_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim().eq_ignore_ascii_case("rel").then_some(value.trim().trim_matches('"'))
        })
        .flat_map(str::split_whitespace)
        .map(str::to_ascii_lowercase)
        .collect();
    if rels.is_empty() {
        return None;
    }
    Some((url.to_string(), rels))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
