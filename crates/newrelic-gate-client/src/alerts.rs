// crates/newrelic-gate-client/src/alerts.rs
// ============================================================================
// Module: Alerts Adapter
// Description: Alert policy and alert incident listing.
// Purpose: Apply incident filters the upstream endpoint does not support.
// Dependencies: newrelic-gate-core, serde_json
// ============================================================================

//! ## Overview
//! `only_open` and `priority` never reach the upstream query. They are
//! applied to the full concatenation of every fetched page, so an
//! auto-paginated call filters across all pages at once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use newrelic_gate_core::AlertIncident;
use newrelic_gate_core::ListAlertPoliciesArgs;
use newrelic_gate_core::ListIncidentsArgs;
use newrelic_gate_core::NewRelicError;
use newrelic_gate_core::QueryParams;
use serde_json::Value;

use crate::client::NewRelicClient;

// ============================================================================
// SECTION: Request Shapes
// ============================================================================

/// Resource path for alert policies.
pub const POLICIES_PATH: &str = "/alerts_policies";
/// Resource path for alert incidents.
pub const INCIDENTS_PATH: &str = "/alerts_incidents";

/// Keeps incidents matching the local filters, preserving order.
#[must_use]
pub fn filter_incidents(incidents: Vec<AlertIncident>, args: &ListIncidentsArgs) -> Vec<AlertIncident> {
    incidents
        .into_iter()
        .filter(|incident| !args.only_open || incident.is_open())
        .filter(|incident| {
            args.priority.as_deref().is_none_or(|priority| incident.has_priority(priority))
        })
        .collect()
}

// ============================================================================
// SECTION: Operations
// ============================================================================

impl NewRelicClient {
    /// Lists alert policies.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError`] when any requested page fails.
    pub async fn list_alert_policies(
        &self,
        args: &ListAlertPoliciesArgs,
    ) -> Result<Vec<Value>, NewRelicError> {
        let mut query = QueryParams::new();
        query.push_filter("filter[name]", args.filter_name.as_deref());
        let paged = self.list(POLICIES_PATH, "policies", query, args.paging).await?;
        Ok(paged.items)
    }

    /// Lists alert incidents, filtered locally after every page is fetched.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError`] when any requested page fails.
    pub async fn list_incidents(
        &self,
        args: &ListIncidentsArgs,
    ) -> Result<Vec<AlertIncident>, NewRelicError> {
        let paged = self.list(INCIDENTS_PATH, "incidents", QueryParams::new(), args.paging).await?;
        Ok(filter_incidents(paged.items, args))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
