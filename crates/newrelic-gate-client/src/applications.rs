// crates/newrelic-gate-client/src/applications.rs
// ============================================================================
// Module: APM Applications Adapter
// Description: REST list and lookup of APM applications.
// Purpose: Map application filters onto `filter[...]` query parameters.
// Dependencies: newrelic-gate-core, serde_json
// ============================================================================

//! ## Overview
//! `filter_ids` is sent as one comma-joined `filter[ids]` value and left out
//! entirely when empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use newrelic_gate_core::ApiKind;
use newrelic_gate_core::GetApplicationArgs;
use newrelic_gate_core::ListApplicationsArgs;
use newrelic_gate_core::NewRelicError;
use newrelic_gate_core::QueryParams;
use serde_json::Value;

use crate::client::NewRelicClient;

// ============================================================================
// SECTION: Request Shapes
// ============================================================================

/// Resource path for the application list.
pub const APPLICATIONS_PATH: &str = "/applications";

/// Builds the query for an application list.
#[must_use]
pub fn applications_query(args: &ListApplicationsArgs) -> QueryParams {
    let mut query = QueryParams::new();
    query
        .push_filter("filter[name]", args.filter_name.as_deref())
        .push_filter("filter[host]", args.filter_host.as_deref())
        .push_joined("filter[ids]", &args.filter_ids)
        .push_filter("filter[language]", args.filter_language.as_deref());
    query
}

// ============================================================================
// SECTION: Operations
// ============================================================================

impl NewRelicClient {
    /// Lists APM applications.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError`] when any requested page fails.
    pub async fn list_applications(
        &self,
        args: &ListApplicationsArgs,
    ) -> Result<Vec<Value>, NewRelicError> {
        let paged = self
            .list(APPLICATIONS_PATH, "applications", applications_query(args), args.paging)
            .await?;
        Ok(paged.items)
    }

    /// Fetches one APM application.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError`] when the call fails or the body has no
    /// `application` object.
    pub async fn get_application(&self, args: &GetApplicationArgs) -> Result<Value, NewRelicError> {
        let path = format!("{APPLICATIONS_PATH}/{}", args.application_id);
        let mut response = self.rest().get(&path, &QueryParams::new()).await?;
        match response.data.get_mut("application").map(Value::take) {
            Some(application) if application.is_object() => Ok(application),
            _ => Err(NewRelicError::MalformedResponse {
                api: ApiKind::Rest,
                message: "response has no `application` object".to_string(),
            }),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
