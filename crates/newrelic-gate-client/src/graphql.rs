// crates/newrelic-gate-client/src/graphql.rs
// ============================================================================
// Module: GraphQL Transport
// Description: Authenticated `{query, variables}` POSTs to the GraphQL endpoint.
// Purpose: Normalize transport failures while leaving `errors[]` to callers.
// Dependencies: newrelic-gate-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! [`GraphqlClient::execute`] checks the API key before sending, posts the
//! query envelope, and decodes the body into a [`GraphqlEnvelope`]. It never
//! inspects `errors[]`; adapters decide how partial success is treated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use newrelic_gate_core::ApiKind;
use newrelic_gate_core::Credentials;
use newrelic_gate_core::GraphqlEnvelope;
use newrelic_gate_core::NewRelicError;
use reqwest::Client;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::audit::ApiAuditEvent;
use crate::audit::ApiAuditSink;
use crate::rest::API_KEY_HEADER;
use crate::settings::truncate_body;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request body posted to the GraphQL endpoint.
#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    /// Query document.
    query: &'a str,
    /// Variables, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a Value>,
}

/// GraphQL transport bound to one endpoint and credential set.
#[derive(Clone)]
pub struct GraphqlClient {
    /// Shared HTTP client.
    http: Client,
    /// Full GraphQL endpoint URL.
    endpoint: String,
    /// Credentials read at call time.
    credentials: Credentials,
    /// Cap on captured error bodies.
    max_error_body_bytes: usize,
    /// Audit sink for call events.
    audit: Arc<dyn ApiAuditSink>,
}

impl GraphqlClient {
    /// Creates a GraphQL transport for `endpoint`.
    #[must_use]
    pub fn new(
        http: Client,
        endpoint: impl Into<String>,
        credentials: Credentials,
        max_error_body_bytes: usize,
        audit: Arc<dyn ApiAuditSink>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            credentials,
            max_error_body_bytes,
            audit,
        }
    }

    /// Returns the GraphQL endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the credentials this transport sends.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Executes a query and returns the raw envelope.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::Configuration`] before sending when the API key
    /// is unset, [`NewRelicError::Unauthorized`] on 401, and
    /// [`NewRelicError::Transport`] for other non-2xx statuses or network
    /// failures.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<&Value>,
    ) -> Result<GraphqlEnvelope<T>, NewRelicError> {
        let api_key = self.credentials.api_key()?;
        let started = Instant::now();
        let result = self.exchange(api_key, query, variables).await;
        let path = Url::parse(&self.endpoint)
            .map(|url| url.path().to_string())
            .unwrap_or_else(|_| self.endpoint.clone());
        let event = ApiAuditEvent::new(
            ApiKind::Graphql,
            "POST",
            &path,
            result.as_ref().map(|(status, _)| *status),
            started.elapsed(),
        );
        self.audit.record(&event);
        result.map(|(_, envelope)| envelope)
    }

    /// Performs the HTTP exchange and decodes the envelope.
    async fn exchange<T: DeserializeOwned>(
        &self,
        api_key: &str,
        query: &str,
        variables: Option<&Value>,
    ) -> Result<(u16, GraphqlEnvelope<T>), NewRelicError> {
        let body = GraphqlRequest {
            query,
            variables,
        };
        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| NewRelicError::network(ApiKind::Graphql, err.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| NewRelicError::network(ApiKind::Graphql, err.to_string()))?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(NewRelicError::Unauthorized);
        }
        if !status.is_success() {
            return Err(NewRelicError::status(
                ApiKind::Graphql,
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                Some(truncate_body(&bytes, self.max_error_body_bytes)),
            ));
        }

        let envelope = serde_json::from_slice(&bytes).map_err(|err| {
            NewRelicError::MalformedResponse {
                api: ApiKind::Graphql,
                message: err.to_string(),
            }
        })?;
        Ok((status.as_u16(), envelope))
    }
}
