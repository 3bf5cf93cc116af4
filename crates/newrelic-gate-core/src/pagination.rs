// crates/newrelic-gate-core/src/pagination.rs
// ============================================================================
// Module: Auto-Pagination Engine
// Description: Follows `Link: rel="next"` continuations across REST pages.
// Purpose: Materialize single-page or exhaustive list results uniformly.
// Dependencies: crate::response, crate::error
// ============================================================================

//! ## Overview
//! [`collect_pages`] starts from an already-fetched first page. In
//! [`PageMode::SinglePage`] it returns that page's items and ignores any
//! `next` relation. In [`PageMode::Exhaustive`] it fetches each `next` URL in
//! turn, strictly sequentially, and concatenates items in fetch order.
//!
//! Invariants:
//! - A failure on any page is returned as-is and discards accumulated items.
//! - A `next` URL that was already visited ends the walk; no URL is fetched twice.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::future::Future;

use serde::Serialize;

use crate::error::NewRelicError;
use crate::response::RestResponse;

// ============================================================================
// SECTION: Types
// ============================================================================

/// How many pages a list call materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMode {
    /// Return the requested page only.
    SinglePage,
    /// Follow `next` relations until none remain.
    Exhaustive,
}

impl PageMode {
    /// Maps an `auto_paginate` flag to a mode.
    #[must_use]
    pub const fn from_auto_paginate(auto_paginate: bool) -> Self {
        if auto_paginate { Self::Exhaustive } else { Self::SinglePage }
    }
}

/// Why the pager stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Auto-pagination was off.
    SinglePage,
    /// The last page carried no `next` relation.
    Exhausted,
    /// A `next` relation pointed at an already-visited URL.
    RepeatedLink,
}

impl StopReason {
    /// Returns a stable label for the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SinglePage => "single_page",
            Self::Exhausted => "exhausted",
            Self::RepeatedLink => "repeated_link",
        }
    }
}

/// Materialized list result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<T> {
    /// Items from every fetched page, in fetch order.
    pub items: Vec<T>,
    /// Number of pages fetched.
    pub pages: usize,
    /// Why fetching stopped.
    pub stop_reason: StopReason,
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Collects items starting from `first`, fetching continuations with `fetch_next`.
///
/// `fetch_next` receives the absolute `next` URL of the previous page.
///
/// # Errors
///
/// Returns the first error produced by `fetch_next`; items gathered before it
/// are dropped.
pub async fn collect_pages<T, F, Fut>(
    first: RestResponse<Vec<T>>,
    mode: PageMode,
    mut fetch_next: F,
) -> Result<Paged<T>, NewRelicError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<RestResponse<Vec<T>>, NewRelicError>>,
{
    if mode == PageMode::SinglePage {
        return Ok(Paged {
            items: first.data,
            pages: 1,
            stop_reason: StopReason::SinglePage,
        });
    }

    let mut visited = BTreeSet::new();
    visited.insert(first.url.clone());
    let mut next = first.links.next().map(ToString::to_string);
    let mut items = first.data;
    let mut pages = 1;

    let stop_reason = loop {
        let Some(url) = next.take() else {
            break StopReason::Exhausted;
        };
        if !visited.insert(url.clone()) {
            break StopReason::RepeatedLink;
        }
        let page = fetch_next(url).await?;
        pages += 1;
        next = page.links.next().map(ToString::to_string);
        items.extend(page.data);
    };

    Ok(Paged {
        items,
        pages,
        stop_reason,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
