// crates/newrelic-gate-core/src/lib.rs
// ============================================================================
// Module: New Relic Gate Core Library
// Description: Public API surface for the New Relic Gate core.
// Purpose: Expose region routing, errors, pagination, and argument records.
// Dependencies: serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! New Relic Gate core holds the I/O-free pieces shared by the REST and
//! GraphQL transports: region resolution, credentials, the error taxonomy,
//! `Link` header parsing, query-parameter serialization, the auto-pagination
//! engine, and the typed argument record for every adapter operation.
//!
//! Invariants:
//! - Every failure is a [`NewRelicError`] attributable to one [`ErrorKind`].
//! - Nothing in this crate holds shared mutable state.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod arguments;
pub mod credentials;
pub mod error;
pub mod heuristics;
pub mod links;
pub mod pagination;
pub mod query;
pub mod records;
pub mod region;
pub mod response;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use arguments::AccountArgs;
pub use arguments::CreateDeploymentArgs;
pub use arguments::DeleteDeploymentArgs;
pub use arguments::GetApplicationArgs;
pub use arguments::GetMetricDataArgs;
pub use arguments::ListAlertPoliciesArgs;
pub use arguments::ListApplicationHostsArgs;
pub use arguments::ListApplicationsArgs;
pub use arguments::ListDeploymentsArgs;
pub use arguments::ListIncidentsArgs;
pub use arguments::ListMetricNamesArgs;
pub use arguments::NrqlQueryArgs;
pub use arguments::PageOptions;
pub use arguments::SearchEntitiesArgs;
pub use credentials::Credentials;
pub use error::ApiKind;
pub use error::ErrorKind;
pub use error::NewRelicError;
pub use links::LinkRelations;
pub use pagination::PageMode;
pub use pagination::Paged;
pub use pagination::StopReason;
pub use pagination::collect_pages;
pub use query::QueryParams;
pub use records::AccountDetails;
pub use records::AlertIncident;
pub use records::ApmApplication;
pub use records::EntitySummary;
pub use records::EntityTag;
pub use records::NrqlMetadata;
pub use records::NrqlResult;
pub use records::NrqlTimeWindow;
pub use region::Region;
pub use region::RegionEndpoints;
pub use response::GraphqlEnvelope;
pub use response::GraphqlErrorEntry;
pub use response::RestResponse;
