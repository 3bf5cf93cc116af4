// crates/newrelic-gate-client/src/lib.rs
// ============================================================================
// Module: New Relic Gate Client Library
// Description: REST and GraphQL transports plus the endpoint adapters.
// Purpose: Execute normalized New Relic operations over HTTP.
// Dependencies: newrelic-gate-core, reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! [`NewRelicClient`] pairs a [`RestClient`] and a [`GraphqlClient`] bound to
//! one region and credential set. Each resource family adds its operations
//! to the client: applications, deployments, metrics and hosts, alerts, and
//! the GraphQL account and entity queries.
//!
//! Invariants:
//! - The client holds no per-call mutable state; concurrent calls need no
//!   coordination.
//! - Nothing is retried.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod account;
pub mod alerts;
pub mod applications;
pub mod audit;
pub mod client;
pub mod deployments;
pub mod graphql;
pub mod metrics;
pub mod queries;
pub mod rest;
pub mod settings;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::ApiAuditEvent;
pub use audit::ApiAuditSink;
pub use audit::CallOutcome;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::PaginationAuditEvent;
pub use audit::StderrAuditSink;
pub use client::ClientParams;
pub use client::NewRelicClient;
pub use graphql::GraphqlClient;
pub use rest::API_KEY_HEADER;
pub use rest::RestClient;
pub use settings::HttpSettings;
