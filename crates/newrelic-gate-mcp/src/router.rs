// crates/newrelic-gate-mcp/src/router.rs
// ============================================================================
// Module: Tool Router
// Description: Dispatches tool calls to the New Relic endpoint adapters.
// Purpose: Decode tool arguments, build a per-call client, and serialize results.
// Dependencies: newrelic-gate-client, newrelic-gate-config, newrelic-gate-core
// ============================================================================

//! ## Overview
//! The router is a thin wrapper over [`NewRelicClient`]. Each call decodes
//! its JSON payload into the tool's argument record, builds a client from
//! the per-call [`RequestContext`] merged over the configured defaults, and
//! runs the matching adapter operation.
//!
//! ## Invariants
//! - Credentials come only from the configuration and the explicit context.
//! - The shared HTTP client and audit sink are the only state reused across
//!   calls.
//! - Upstream failures keep their error kind and message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use newrelic_gate_client::ApiAuditSink;
use newrelic_gate_client::ClientParams;
use newrelic_gate_client::NewRelicClient;
use newrelic_gate_config::ConfigError;
use newrelic_gate_config::GatewayConfig;
use newrelic_gate_core::AccountArgs;
use newrelic_gate_core::CreateDeploymentArgs;
use newrelic_gate_core::Credentials;
use newrelic_gate_core::DeleteDeploymentArgs;
use newrelic_gate_core::GetApplicationArgs;
use newrelic_gate_core::GetMetricDataArgs;
use newrelic_gate_core::ListAlertPoliciesArgs;
use newrelic_gate_core::ListApplicationHostsArgs;
use newrelic_gate_core::ListApplicationsArgs;
use newrelic_gate_core::ListDeploymentsArgs;
use newrelic_gate_core::ListIncidentsArgs;
use newrelic_gate_core::ListMetricNamesArgs;
use newrelic_gate_core::NewRelicError;
use newrelic_gate_core::NrqlQueryArgs;
use newrelic_gate_core::Region;
use newrelic_gate_core::SearchEntitiesArgs;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::tools::ToolDefinition;
use crate::tools::ToolName;
use crate::tools::tool_definitions;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Per-call credentials supplied by the caller.
///
/// Present fields override the configured defaults for this call only.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RequestContext {
    /// API key for this call.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Default account id for this call.
    #[serde(default)]
    pub account_id: Option<String>,
    /// Region token for this call.
    #[serde(default)]
    pub region: Option<String>,
}

impl RequestContext {
    /// Returns this context's credential overrides.
    fn credentials(&self) -> Credentials {
        Credentials::new(non_blank(self.api_key.as_deref()), non_blank(self.account_id.as_deref()))
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("account_id", &self.account_id)
            .field("region", &self.region)
            .finish()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tool routing errors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool name not recognized.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// Tool payload deserialization failed.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    /// Tool result serialization failed.
    #[error("serialization failure")]
    Serialization,
    /// Upstream operation failed.
    #[error(transparent)]
    Upstream(#[from] NewRelicError),
}

impl ToolError {
    /// Returns a stable label for the error category.
    ///
    /// Upstream failures report their own error kind.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidParams(_) => "invalid_params",
            Self::Serialization => "serialization",
            Self::Upstream(error) => error.kind().as_str(),
        }
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Routes tool calls to adapter operations.
#[derive(Clone)]
pub struct ToolRouter {
    /// Validated gateway configuration.
    config: GatewayConfig,
    /// Shared HTTP client.
    http: reqwest::Client,
    /// Audit sink handed to every per-call client.
    audit: Arc<dyn ApiAuditSink>,
}

impl ToolRouter {
    /// Builds a router from explicit parts.
    #[must_use]
    pub fn new(config: GatewayConfig, http: reqwest::Client, audit: Arc<dyn ApiAuditSink>) -> Self {
        Self {
            config,
            http,
            audit,
        }
    }

    /// Builds a router whose HTTP client and audit sink come from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the HTTP client or audit sink cannot be built.
    pub fn from_config(config: GatewayConfig) -> Result<Self, ConfigError> {
        let http = config
            .http_settings()
            .build_client()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        let audit = config.build_audit_sink()?;
        Ok(Self::new(config, http, audit))
    }

    /// Lists the tools served by this router.
    #[must_use]
    #[allow(clippy::unused_self, reason = "Catalog is static; kept as a router method.")]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    /// Handles a tool call by name with JSON payload.
    ///
    /// A `null` payload is treated as an empty argument object.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the tool is unknown, the payload does not
    /// decode, or the upstream operation fails.
    pub async fn handle_tool_call(
        &self,
        context: &RequestContext,
        name: &str,
        payload: Value,
    ) -> Result<Value, ToolError> {
        let tool = ToolName::parse(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let payload = if payload.is_null() { json!({}) } else { payload };
        let client = self.client_for(context);
        match tool {
            ToolName::ValidateCredentials => {
                let valid = client.validate_credentials().await;
                Ok(json!({ "valid": valid }))
            }
            ToolName::GetAccountDetails => {
                let args: AccountArgs = decode(payload)?;
                encode(&client.get_account_details(&args).await?)
            }
            ToolName::RunNrqlQuery => {
                let args: NrqlQueryArgs = decode(payload)?;
                encode(&client.run_nrql_query(&args).await?)
            }
            ToolName::ListApmApplications => {
                let args: AccountArgs = decode(payload)?;
                encode(&client.list_apm_applications(&args).await?)
            }
            ToolName::SearchEntities => {
                let args: SearchEntitiesArgs = decode(payload)?;
                encode(&client.search_entities(&args).await?)
            }
            ToolName::ListApplications => {
                let args: ListApplicationsArgs = decode(payload)?;
                encode(&client.list_applications(&args).await?)
            }
            ToolName::GetApplication => {
                let args: GetApplicationArgs = decode(payload)?;
                encode(&client.get_application(&args).await?)
            }
            ToolName::ListDeployments => {
                let args: ListDeploymentsArgs = decode(payload)?;
                encode(&client.list_deployments(&args).await?)
            }
            ToolName::CreateDeployment => {
                let args: CreateDeploymentArgs = decode(payload)?;
                encode(&client.create_deployment(&args).await?.data)
            }
            ToolName::DeleteDeployment => {
                let args: DeleteDeploymentArgs = decode(payload)?;
                encode(&client.delete_deployment(&args).await?.data)
            }
            ToolName::ListMetricNames => {
                let args: ListMetricNamesArgs = decode(payload)?;
                encode(&client.list_metric_names(&args).await?)
            }
            ToolName::GetMetricData => {
                let args: GetMetricDataArgs = decode(payload)?;
                encode(&client.get_metric_data(&args).await?)
            }
            ToolName::ListApplicationHosts => {
                let args: ListApplicationHostsArgs = decode(payload)?;
                encode(&client.list_application_hosts(&args).await?)
            }
            ToolName::ListAlertPolicies => {
                let args: ListAlertPoliciesArgs = decode(payload)?;
                encode(&client.list_alert_policies(&args).await?)
            }
            ToolName::ListIncidents => {
                let args: ListIncidentsArgs = decode(payload)?;
                encode(&client.list_incidents(&args).await?)
            }
        }
    }

    /// Builds the client for one call.
    fn client_for(&self, context: &RequestContext) -> NewRelicClient {
        let region = context
            .region
            .as_deref()
            .map_or_else(|| self.config.region(), |token| Region::parse(Some(token)));
        NewRelicClient::new(ClientParams {
            http: self.http.clone(),
            endpoints: self.config.endpoints_for(region),
            credentials: self.config.credentials().merged_with(&context.credentials()),
            max_error_body_bytes: self.config.http.max_error_body_bytes,
            audit: Arc::clone(&self.audit),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes a JSON value into a typed argument record.
fn decode<T: for<'de> Deserialize<'de>>(payload: Value) -> Result<T, ToolError> {
    serde_json::from_value(payload).map_err(|err| ToolError::InvalidParams(err.to_string()))
}

/// Serializes an operation result.
fn encode<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|_| ToolError::Serialization)
}

/// Drops blank strings.
fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|text| !text.is_empty()).map(ToString::to_string)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
