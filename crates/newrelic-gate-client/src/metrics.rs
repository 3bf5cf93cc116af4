// crates/newrelic-gate-client/src/metrics.rs
// ============================================================================
// Module: Metrics Adapter
// Description: Metric names, metric timeslice data, and application hosts.
// Purpose: Map metric arguments onto the per-host REST endpoints.
// Dependencies: newrelic-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Metric data names and values use the repeated `names[]=` / `values[]=`
//! form the endpoint expects; every other collection is comma-joined.
//! Time bounds are forwarded verbatim.

// ============================================================================
// SECTION: Imports
// ============================================================================

use newrelic_gate_core::GetMetricDataArgs;
use newrelic_gate_core::ListApplicationHostsArgs;
use newrelic_gate_core::ListMetricNamesArgs;
use newrelic_gate_core::NewRelicError;
use newrelic_gate_core::QueryParams;
use serde_json::Value;

use crate::client::NewRelicClient;

// ============================================================================
// SECTION: Request Shapes
// ============================================================================

/// Resource path for one application host.
fn host_path(application_id: u64, host_id: u64) -> String {
    format!("/applications/{application_id}/hosts/{host_id}")
}

/// Builds the query for a metric data request.
///
/// # Errors
///
/// Returns [`NewRelicError::Validation`] when no metric name is given.
pub fn metric_data_query(args: &GetMetricDataArgs) -> Result<QueryParams, NewRelicError> {
    if args.names.iter().all(|name| name.trim().is_empty()) {
        return Err(NewRelicError::Validation("at least one metric name is required".to_string()));
    }
    let mut query = QueryParams::new();
    query
        .push_repeated("names[]", &args.names)
        .push_repeated("values[]", &args.values)
        .push_filter("from", args.from.as_deref())
        .push_filter("to", args.to.as_deref())
        .push_opt("period", args.period)
        .push_opt("summarize", args.summarize);
    Ok(query)
}

/// Builds the query for an application host list.
#[must_use]
pub fn hosts_query(args: &ListApplicationHostsArgs) -> QueryParams {
    let mut query = QueryParams::new();
    query
        .push_filter("filter[hostname]", args.filter_hostname.as_deref())
        .push_joined("filter[ids]", &args.filter_ids);
    query
}

// ============================================================================
// SECTION: Operations
// ============================================================================

impl NewRelicClient {
    /// Lists metric names reported by one application host.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError`] when any requested page fails.
    pub async fn list_metric_names(
        &self,
        args: &ListMetricNamesArgs,
    ) -> Result<Vec<Value>, NewRelicError> {
        let path = format!("{}/metrics", host_path(args.application_id, args.host_id));
        let mut query = QueryParams::new();
        query.push_filter("name", args.name.as_deref());
        let paged = self.list(&path, "metrics", query, args.paging).await?;
        Ok(paged.items)
    }

    /// Fetches metric timeslice data and returns the `metric_data` object.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::Validation`] before any call when `names` is
    /// empty, otherwise any call failure.
    pub async fn get_metric_data(&self, args: &GetMetricDataArgs) -> Result<Value, NewRelicError> {
        let query = metric_data_query(args)?;
        let path = format!("{}/metrics/data", host_path(args.application_id, args.host_id));
        let mut response = self.rest().get(&path, &query).await?;
        Ok(response.data.get_mut("metric_data").map(Value::take).unwrap_or(response.data))
    }

    /// Lists the hosts of an application.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError`] when any requested page fails.
    pub async fn list_application_hosts(
        &self,
        args: &ListApplicationHostsArgs,
    ) -> Result<Vec<Value>, NewRelicError> {
        let path = format!("/applications/{}/hosts", args.application_id);
        let paged = self.list(&path, "application_hosts", hosts_query(args), args.paging).await?;
        Ok(paged.items)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
