// crates/newrelic-gate-mcp/src/tools.rs
// ============================================================================
// Module: Tool Catalog
// Description: Canonical tool names and their catalog descriptions.
// Purpose: Provide the closed set of tools exposed over the gateway.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`ToolName`] is the closed set of tool identifiers. Names are stable
//! `snake_case` strings; [`ToolName::all`] fixes the catalog order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Tool Names
// ============================================================================

/// Canonical tool names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Check whether the API key resolves to a user.
    ValidateCredentials,
    /// Look up account id and name.
    GetAccountDetails,
    /// Run an NRQL query.
    RunNrqlQuery,
    /// List APM application entities of an account.
    ListApmApplications,
    /// Search entities by name fragment.
    SearchEntities,
    /// List APM applications over REST.
    ListApplications,
    /// Fetch one APM application over REST.
    GetApplication,
    /// List deployments of an application.
    ListDeployments,
    /// Record a deployment marker.
    CreateDeployment,
    /// Delete a deployment marker.
    DeleteDeployment,
    /// List metric names of an application host.
    ListMetricNames,
    /// Fetch metric timeslice data.
    GetMetricData,
    /// List hosts of an application.
    ListApplicationHosts,
    /// List alert policies.
    ListAlertPolicies,
    /// List alert incidents.
    ListIncidents,
}

impl ToolName {
    /// Returns the canonical string name for the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidateCredentials => "validate_credentials",
            Self::GetAccountDetails => "get_account_details",
            Self::RunNrqlQuery => "run_nrql_query",
            Self::ListApmApplications => "list_apm_applications",
            Self::SearchEntities => "search_entities",
            Self::ListApplications => "list_applications",
            Self::GetApplication => "get_application",
            Self::ListDeployments => "list_deployments",
            Self::CreateDeployment => "create_deployment",
            Self::DeleteDeployment => "delete_deployment",
            Self::ListMetricNames => "list_metric_names",
            Self::GetMetricData => "get_metric_data",
            Self::ListApplicationHosts => "list_application_hosts",
            Self::ListAlertPolicies => "list_alert_policies",
            Self::ListIncidents => "list_incidents",
        }
    }

    /// Returns all tool names in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ValidateCredentials,
            Self::GetAccountDetails,
            Self::RunNrqlQuery,
            Self::ListApmApplications,
            Self::SearchEntities,
            Self::ListApplications,
            Self::GetApplication,
            Self::ListDeployments,
            Self::CreateDeployment,
            Self::DeleteDeployment,
            Self::ListMetricNames,
            Self::GetMetricData,
            Self::ListApplicationHosts,
            Self::ListAlertPolicies,
            Self::ListIncidents,
        ]
    }

    /// Parses a tool name from its string representation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|tool| tool.as_str() == name)
    }

    /// Returns the one-line catalog description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ValidateCredentials => "Check that the configured API key is accepted.",
            Self::GetAccountDetails => "Get the id and name of a New Relic account.",
            Self::RunNrqlQuery => "Run an NRQL query against an account.",
            Self::ListApmApplications => "List APM application entities of an account.",
            Self::SearchEntities => "Search entities by name, optionally by type.",
            Self::ListApplications => "List APM applications with optional filters.",
            Self::GetApplication => "Get a single APM application by id.",
            Self::ListDeployments => "List deployment markers of an application.",
            Self::CreateDeployment => "Record a deployment marker for an application.",
            Self::DeleteDeployment => "Delete a deployment marker; requires confirm = true.",
            Self::ListMetricNames => "List metric names reported by an application host.",
            Self::GetMetricData => "Get metric timeslice data for an application host.",
            Self::ListApplicationHosts => "List hosts running an application.",
            Self::ListAlertPolicies => "List alert policies with an optional name filter.",
            Self::ListIncidents => "List alert incidents, optionally open-only or by priority.",
        }
    }

    /// Returns true when the tool mutates upstream state.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        matches!(self, Self::CreateDeployment | Self::DeleteDeployment)
    }
}

// ============================================================================
// SECTION: Tool Definitions
// ============================================================================

/// Catalog entry returned by `list_tools`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: ToolName,
    /// One-line description.
    pub description: &'static str,
    /// True when the tool mutates upstream state.
    pub mutation: bool,
}

/// Returns catalog entries for every tool in canonical order.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolName::all()
        .iter()
        .map(|tool| ToolDefinition {
            name: *tool,
            description: tool.description(),
            mutation: tool.is_mutation(),
        })
        .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
