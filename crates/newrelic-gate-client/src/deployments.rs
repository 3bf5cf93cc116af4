// crates/newrelic-gate-client/src/deployments.rs
// ============================================================================
// Module: Deployments Adapter
// Description: List, record, and delete deployment markers for an application.
// Purpose: Shape the nested `deployment` body and gate destructive deletes.
// Dependencies: newrelic-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Optional deployment fields are only placed in the body when present; the
//! upstream never sees explicit nulls. Deleting requires `confirm = true` and
//! is refused locally, before any request, otherwise.

// ============================================================================
// SECTION: Imports
// ============================================================================

use newrelic_gate_core::CreateDeploymentArgs;
use newrelic_gate_core::DeleteDeploymentArgs;
use newrelic_gate_core::ListDeploymentsArgs;
use newrelic_gate_core::NewRelicError;
use newrelic_gate_core::QueryParams;
use newrelic_gate_core::RestResponse;
use serde_json::Map;
use serde_json::Value;

use crate::client::NewRelicClient;

// ============================================================================
// SECTION: Request Shapes
// ============================================================================

/// Resource path for an application's deployments.
#[must_use]
pub fn deployments_path(application_id: u64) -> String {
    format!("/applications/{application_id}/deployments")
}

/// Builds the `{deployment: {...}}` body for a new deployment.
#[must_use]
pub fn deployment_body(args: &CreateDeploymentArgs) -> Value {
    let mut deployment = Map::new();
    deployment.insert("revision".to_string(), Value::String(args.revision.clone()));
    let optional = [
        ("changelog", &args.changelog),
        ("description", &args.description),
        ("user", &args.user),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            deployment.insert(key.to_string(), Value::String(value.clone()));
        }
    }
    let mut body = Map::new();
    body.insert("deployment".to_string(), Value::Object(deployment));
    Value::Object(body)
}

// ============================================================================
// SECTION: Operations
// ============================================================================

impl NewRelicClient {
    /// Lists deployments of an application.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError`] when any requested page fails.
    pub async fn list_deployments(
        &self,
        args: &ListDeploymentsArgs,
    ) -> Result<Vec<Value>, NewRelicError> {
        let path = deployments_path(args.application_id);
        let paged = self.list(&path, "deployments", QueryParams::new(), args.paging).await?;
        Ok(paged.items)
    }

    /// Records a deployment and returns the upstream response verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError`] when the call fails.
    pub async fn create_deployment(
        &self,
        args: &CreateDeploymentArgs,
    ) -> Result<RestResponse<Value>, NewRelicError> {
        self.rest().post(&deployments_path(args.application_id), &deployment_body(args)).await
    }

    /// Deletes a deployment record.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::Precondition`] without calling upstream when
    /// `confirm` is not set, otherwise any call failure.
    pub async fn delete_deployment(
        &self,
        args: &DeleteDeploymentArgs,
    ) -> Result<RestResponse<Value>, NewRelicError> {
        if !args.confirm {
            return Err(NewRelicError::Precondition(
                "deleting a deployment requires confirm = true".to_string(),
            ));
        }
        let path = format!("{}/{}", deployments_path(args.application_id), args.deployment_id);
        self.rest().delete(&path).await
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
