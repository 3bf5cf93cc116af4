// crates/newrelic-gate-core/src/heuristics.rs
// ============================================================================
// Module: NRQL Heuristics
// Description: String predicates standing in for structural NRQL analysis.
// Purpose: Keep text-matching rules in one place so they can be replaced.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Two decisions are made by substring matching rather than by parsing:
//! whether an NRQL query produces a time series, and whether an upstream
//! error message reports a syntax error. Both predicates are case-insensitive.

/// Returns true when the query text mentions `TIMESERIES` in any case.
#[must_use]
pub fn is_time_series_query(nrql: &str) -> bool {
    nrql.to_ascii_lowercase().contains("timeseries")
}

/// Returns true when an upstream error message reports a syntax error.
#[must_use]
pub fn is_syntax_error_message(message: &str) -> bool {
    message.to_ascii_lowercase().contains("syntax error")
}
