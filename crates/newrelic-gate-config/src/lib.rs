// crates/newrelic-gate-config/src/lib.rs
// ============================================================================
// Module: New Relic Gate Config Library
// Description: Canonical config model, environment overrides, and validation.
// Purpose: Single source of truth for newrelic-gate.toml semantics.
// Dependencies: newrelic-gate-core, newrelic-gate-client, serde, toml
// ============================================================================

//! ## Overview
//! `newrelic-gate-config` loads `newrelic-gate.toml`, applies the
//! `NEW_RELIC_*` environment overrides, and validates the result fail-closed.
//! The validated config hands out default credentials, region endpoints,
//! HTTP settings, and the configured audit sink.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
