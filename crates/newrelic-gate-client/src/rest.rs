// crates/newrelic-gate-client/src/rest.rs
// ============================================================================
// Module: REST Transport
// Description: Authenticated GET/POST/DELETE calls against the REST v2 API.
// Purpose: Build `.json` URLs, parse `Link` headers, and type non-2xx failures.
// Dependencies: newrelic-gate-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! [`RestClient`] turns a resource path plus [`QueryParams`] into
//! `{base}{path}.json?{query}`, attaches the `Api-Key` header, and returns a
//! [`RestResponse`] carrying the literal status, decoded body, final URL, and
//! parsed `Link` relations. The API key is read per call.
//!
//! Invariants:
//! - 401 maps to [`NewRelicError::Unauthorized`]; any other non-2xx maps to
//!   [`NewRelicError::Transport`] with a truncated body capture.
//! - No call is retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use newrelic_gate_core::ApiKind;
use newrelic_gate_core::Credentials;
use newrelic_gate_core::LinkRelations;
use newrelic_gate_core::NewRelicError;
use newrelic_gate_core::QueryParams;
use newrelic_gate_core::RestResponse;
use reqwest::Client;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use reqwest::header::LINK;
use serde_json::Value;
use url::Url;

use crate::audit::ApiAuditEvent;
use crate::audit::ApiAuditSink;
use crate::settings::truncate_body;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the user API key.
pub const API_KEY_HEADER: &str = "Api-Key";

// ============================================================================
// SECTION: Client
// ============================================================================

/// REST v2 transport bound to one base URL and credential set.
#[derive(Clone)]
pub struct RestClient {
    /// Shared HTTP client.
    http: Client,
    /// Base URL, e.g. `https://api.newrelic.com/v2`.
    base_url: String,
    /// Credentials read at call time.
    credentials: Credentials,
    /// Cap on captured error bodies.
    max_error_body_bytes: usize,
    /// Audit sink for call events.
    audit: Arc<dyn ApiAuditSink>,
}

impl RestClient {
    /// Creates a REST transport.
    #[must_use]
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        credentials: Credentials,
        max_error_body_bytes: usize,
        audit: Arc<dyn ApiAuditSink>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            max_error_body_bytes,
            audit,
        }
    }

    /// Returns the REST base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `{base}{path}.json` with `query` appended.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::Configuration`] when the result is not a valid URL.
    pub fn endpoint(&self, path: &str, query: &QueryParams) -> Result<Url, NewRelicError> {
        let mut url = Url::parse(&format!("{}{path}.json", self.base_url)).map_err(|err| {
            NewRelicError::Configuration(format!("invalid REST url for {path}: {err}"))
        })?;
        query.append_to(&mut url);
        Ok(url)
    }

    /// Issues a GET for `path` with `query`.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError`] for configuration, auth, transport, or decode failures.
    pub async fn get(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<RestResponse<Value>, NewRelicError> {
        let url = self.endpoint(path, query)?;
        self.send(Method::GET, url, None).await
    }

    /// Issues a GET for an absolute URL, as taken from a `Link` relation.
    ///
    /// The URL must share the scheme, host, and port of the REST base; the
    /// API key is never sent anywhere else.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::MalformedResponse`] for an unparsable or
    /// foreign-origin link, and [`NewRelicError`] for configuration, auth,
    /// transport, or decode failures.
    pub async fn get_url(&self, url: &str) -> Result<RestResponse<Value>, NewRelicError> {
        let url = Url::parse(url).map_err(|err| NewRelicError::MalformedResponse {
            api: ApiKind::Rest,
            message: format!("invalid link url: {err}"),
        })?;
        if !self.is_base_origin(&url) {
            return Err(NewRelicError::MalformedResponse {
                api: ApiKind::Rest,
                message: format!(
                    "link leaves the REST origin: {}",
                    url.origin().ascii_serialization()
                ),
            });
        }
        self.send(Method::GET, url, None).await
    }

    /// Returns true when `url` has the same origin as the REST base.
    fn is_base_origin(&self, url: &Url) -> bool {
        Url::parse(&self.base_url).is_ok_and(|base| base.origin() == url.origin())
    }

    /// Issues a POST for `path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError`] for configuration, auth, transport, or decode failures.
    pub async fn post(&self, path: &str, body: &Value) -> Result<RestResponse<Value>, NewRelicError> {
        let url = self.endpoint(path, &QueryParams::new())?;
        self.send(Method::POST, url, Some(body)).await
    }

    /// Issues a DELETE for `path` without a body.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError`] for configuration, auth, transport, or decode failures.
    pub async fn delete(&self, path: &str) -> Result<RestResponse<Value>, NewRelicError> {
        let url = self.endpoint(path, &QueryParams::new())?;
        self.send(Method::DELETE, url, None).await
    }

    /// Sends one request and records its audit event.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<RestResponse<Value>, NewRelicError> {
        let api_key = self.credentials.api_key()?;
        let path = url.path().to_string();
        let started = Instant::now();
        let result = self.exchange(method.clone(), url, api_key, body).await;
        let event = ApiAuditEvent::new(
            ApiKind::Rest,
            method.as_str(),
            &path,
            result.as_ref().map(|response| response.status),
            started.elapsed(),
        );
        self.audit.record(&event);
        result
    }

    /// Performs the HTTP exchange and classifies the response.
    async fn exchange(
        &self,
        method: Method,
        url: Url,
        api_key: &str,
        body: Option<&Value>,
    ) -> Result<RestResponse<Value>, NewRelicError> {
        let mut request = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, api_key)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|err| NewRelicError::network(ApiKind::Rest, err.to_string()))?;

        let status = response.status();
        let final_url = response.url().to_string();
        let links =
            LinkRelations::parse(response.headers().get(LINK).and_then(|value| value.to_str().ok()));
        let bytes = response
            .bytes()
            .await
            .map_err(|err| NewRelicError::network(ApiKind::Rest, err.to_string()))?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(NewRelicError::Unauthorized);
        }
        if !status.is_success() {
            return Err(NewRelicError::status(
                ApiKind::Rest,
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                Some(truncate_body(&bytes, self.max_error_body_bytes)),
            ));
        }

        let data = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|err| NewRelicError::MalformedResponse {
                api: ApiKind::Rest,
                message: err.to_string(),
            })?
        };
        Ok(RestResponse {
            status: status.as_u16(),
            data,
            url: final_url,
            links,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
