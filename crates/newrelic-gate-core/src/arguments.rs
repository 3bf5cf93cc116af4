// crates/newrelic-gate-core/src/arguments.rs
// ============================================================================
// Module: Operation Arguments
// Description: Typed argument records, one per adapter operation.
// Purpose: Keep adapter functions total over a closed set of input shapes.
// Dependencies: serde, crate::pagination
// ============================================================================

//! ## Overview
//! Each adapter operation takes exactly one of these records. They are
//! decoded from tool payloads at the boundary, so shape errors never reach
//! the adapters. Optional filters stay `None` (or empty) when the caller
//! omits them and are then left out of the outgoing request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::pagination::PageMode;

// ============================================================================
// SECTION: Paging
// ============================================================================

/// Paging controls shared by every REST list operation.
///
/// # Invariants
/// - `page` is only sent upstream when `auto_paginate` is false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOptions {
    /// Explicit page number.
    #[serde(default)]
    pub page: Option<u32>,
    /// Follow `next` relations until exhausted.
    #[serde(default)]
    pub auto_paginate: bool,
}

impl PageOptions {
    /// Returns the pagination mode requested by these options.
    #[must_use]
    pub const fn mode(&self) -> PageMode {
        PageMode::from_auto_paginate(self.auto_paginate)
    }

    /// Returns the page number to send, if any.
    #[must_use]
    pub const fn requested_page(&self) -> Option<u32> {
        if self.auto_paginate { None } else { self.page }
    }
}

// ============================================================================
// SECTION: GraphQL Operations
// ============================================================================

/// Arguments for operations scoped to an optional account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountArgs {
    /// Account id; the configured default applies when absent.
    #[serde(default)]
    pub account_id: Option<String>,
}

/// Arguments for an NRQL query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NrqlQueryArgs {
    /// NRQL text.
    pub nrql: String,
    /// Account id; the configured default applies when absent.
    #[serde(default)]
    pub account_id: Option<String>,
}

/// Arguments for a free-text entity search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntitiesArgs {
    /// Name fragment to search for.
    pub query: String,
    /// Entity types to restrict to (`APPLICATION`, `HOST`, ...).
    #[serde(default)]
    pub entity_types: Vec<String>,
    /// Account id restricting the search.
    #[serde(default)]
    pub account_id: Option<String>,
    /// Maximum number of entities returned.
    #[serde(default)]
    pub limit: Option<u32>,
}

// ============================================================================
// SECTION: APM Applications
// ============================================================================

/// Arguments for listing APM applications over REST.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListApplicationsArgs {
    /// Application name filter.
    #[serde(default)]
    pub filter_name: Option<String>,
    /// Host name filter.
    #[serde(default)]
    pub filter_host: Option<String>,
    /// Agent language filter.
    #[serde(default)]
    pub filter_language: Option<String>,
    /// Application id filter; empty means no filter.
    #[serde(default)]
    pub filter_ids: Vec<u64>,
    /// Paging controls.
    #[serde(flatten)]
    pub paging: PageOptions,
}

/// Arguments for fetching one APM application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetApplicationArgs {
    /// Application id.
    pub application_id: u64,
}

// ============================================================================
// SECTION: Deployments
// ============================================================================

/// Arguments for listing deployments of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDeploymentsArgs {
    /// Application id.
    pub application_id: u64,
    /// Paging controls.
    #[serde(flatten)]
    pub paging: PageOptions,
}

/// Arguments for recording a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDeploymentArgs {
    /// Application id.
    pub application_id: u64,
    /// Deployed revision.
    pub revision: String,
    /// Optional change log.
    #[serde(default)]
    pub changelog: Option<String>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional user attribution.
    #[serde(default)]
    pub user: Option<String>,
}

/// Arguments for deleting a deployment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteDeploymentArgs {
    /// Application id.
    pub application_id: u64,
    /// Deployment id.
    pub deployment_id: u64,
    /// Explicit acknowledgement of the destructive call.
    #[serde(default)]
    pub confirm: bool,
}

// ============================================================================
// SECTION: Metrics
// ============================================================================

/// Arguments for listing metric names reported by one application host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetricNamesArgs {
    /// Application id.
    pub application_id: u64,
    /// Application host id.
    pub host_id: u64,
    /// Metric name fragment filter.
    #[serde(default)]
    pub name: Option<String>,
    /// Paging controls.
    #[serde(flatten)]
    pub paging: PageOptions,
}

/// Arguments for fetching metric timeslice data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetMetricDataArgs {
    /// Application id.
    pub application_id: u64,
    /// Application host id.
    pub host_id: u64,
    /// Metric names; at least one is required.
    pub names: Vec<String>,
    /// Metric value names.
    #[serde(default)]
    pub values: Vec<String>,
    /// ISO-8601 start, forwarded verbatim.
    #[serde(default)]
    pub from: Option<String>,
    /// ISO-8601 end, forwarded verbatim.
    #[serde(default)]
    pub to: Option<String>,
    /// Timeslice period in seconds.
    #[serde(default)]
    pub period: Option<u32>,
    /// Collapse timeslices into one summary.
    #[serde(default)]
    pub summarize: Option<bool>,
}

/// Arguments for listing the hosts of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListApplicationHostsArgs {
    /// Application id.
    pub application_id: u64,
    /// Host name filter.
    #[serde(default)]
    pub filter_hostname: Option<String>,
    /// Host id filter; empty means no filter.
    #[serde(default)]
    pub filter_ids: Vec<u64>,
    /// Paging controls.
    #[serde(flatten)]
    pub paging: PageOptions,
}

// ============================================================================
// SECTION: Alerts
// ============================================================================

/// Arguments for listing alert policies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAlertPoliciesArgs {
    /// Policy name filter.
    #[serde(default)]
    pub filter_name: Option<String>,
    /// Paging controls.
    #[serde(flatten)]
    pub paging: PageOptions,
}

/// Arguments for listing alert incidents.
///
/// Both filters are applied locally after every page has been fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListIncidentsArgs {
    /// Keep only incidents that are not closed.
    #[serde(default)]
    pub only_open: bool,
    /// Keep only incidents with exactly this priority.
    #[serde(default)]
    pub priority: Option<String>,
    /// Paging controls.
    #[serde(flatten)]
    pub paging: PageOptions,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
