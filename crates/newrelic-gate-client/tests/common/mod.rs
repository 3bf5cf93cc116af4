// crates/newrelic-gate-client/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Recording HTTP server and client builders for transport tests.
// Purpose: Observe every upstream request a client issues.
// Dependencies: newrelic-gate-client, newrelic-gate-core, tiny_http
// ============================================================================

//! ## Overview
//! [`MockServer`] runs a `tiny_http` server on `127.0.0.1:0`, records each
//! request, and answers through a caller-supplied route function. Tests
//! assert exact call counts, query strings, headers, and bodies.

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared test helpers may be unused in some cases."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use newrelic_gate_client::ApiAuditEvent;
use newrelic_gate_client::ApiAuditSink;
use newrelic_gate_client::ClientParams;
use newrelic_gate_client::NewRelicClient;
use newrelic_gate_client::NoopAuditSink;
use newrelic_gate_client::PaginationAuditEvent;
use newrelic_gate_core::Credentials;
use newrelic_gate_core::RegionEndpoints;
use serde_json::Value;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Recorded Requests
// ============================================================================

/// One request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Path plus query string.
    pub url: String,
    /// Request headers.
    pub headers: Vec<(String, String)>,
    /// Raw request body.
    pub body: String,
}

impl RecordedRequest {
    /// Returns the path without the query string.
    pub fn path(&self) -> &str {
        self.url.split_once('?').map_or(self.url.as_str(), |(path, _)| path)
    }

    /// Returns decoded query pairs.
    pub fn query(&self) -> Vec<(String, String)> {
        let parsed = url::Url::parse(&format!("http://localhost{}", self.url)).unwrap();
        parsed.query_pairs().into_owned().collect()
    }

    /// Returns the first value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<String> {
        self.query().into_iter().find(|(name, _)| name == key).map(|(_, value)| value)
    }

    /// Returns a header value, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Reply produced by a route.
#[derive(Debug, Clone)]
pub struct Reply {
    /// HTTP status.
    pub status: u16,
    /// Response body.
    pub body: String,
    /// Extra response headers.
    pub headers: Vec<(String, String)>,
}

impl Reply {
    /// 200 reply with a JSON body.
    pub fn json(body: &Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            headers: Vec::new(),
        }
    }

    /// Reply with a status and a plain body.
    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: Vec::new(),
        }
    }

    /// Adds a `Link: <url>; rel="next"` header.
    pub fn with_next(mut self, url: &str) -> Self {
        self.headers.push(("Link".to_string(), format!("<{url}>; rel=\"next\"")));
        self
    }
}

// ============================================================================
// SECTION: Mock Server
// ============================================================================

/// Recording HTTP server.
pub struct MockServer {
    /// Base URL, e.g. `http://127.0.0.1:4242`.
    pub base: String,
    /// Requests in arrival order.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Server handle used to stop the accept loop.
    server: Arc<Server>,
    /// Accept loop thread.
    handle: Option<thread::JoinHandle<()>>,
}

impl MockServer {
    /// Starts a server answering every request through `route`.
    ///
    /// `route` receives the request and the server base URL.
    pub fn start<F>(route: F) -> Self
    where
        F: Fn(&RecordedRequest, &str) -> Reply + Send + 'static,
    {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let base = format!("http://{}", server.server_addr().to_ip().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let accept = Arc::clone(&server);
        let recorded = Arc::clone(&requests);
        let thread_base = base.clone();
        let handle = thread::spawn(move || {
            for mut request in accept.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let record = RecordedRequest {
                    method: request.method().as_str().to_string(),
                    url: request.url().to_string(),
                    headers: request
                        .headers()
                        .iter()
                        .map(|header| {
                            (header.field.as_str().to_string(), header.value.as_str().to_string())
                        })
                        .collect(),
                    body,
                };
                let reply = route(&record, &thread_base);
                recorded.lock().unwrap().push(record);

                let mut response =
                    Response::from_string(reply.body).with_status_code(reply.status).with_header(
                        Header::from_bytes("Content-Type", "application/json").unwrap(),
                    );
                for (field, value) in reply.headers {
                    response =
                        response.with_header(Header::from_bytes(field.as_str(), value.as_str()).unwrap());
                }
                let _ = request.respond(response);
            }
        });

        Self {
            base,
            requests,
            server,
            handle: Some(handle),
        }
    }

    /// Returns the REST base URL served by this mock.
    pub fn rest_base(&self) -> String {
        format!("{}/v2", self.base)
    }

    /// Returns a snapshot of recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns the number of requests received.
    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ============================================================================
// SECTION: Audit Capture
// ============================================================================

/// Audit sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Call events.
    pub calls: Mutex<Vec<ApiAuditEvent>>,
    /// Pagination events.
    pub pages: Mutex<Vec<PaginationAuditEvent>>,
}

impl ApiAuditSink for RecordingAuditSink {
    fn record(&self, event: &ApiAuditEvent) {
        self.calls.lock().unwrap().push(event.clone());
    }

    fn record_pagination(&self, event: &PaginationAuditEvent) {
        self.pages.lock().unwrap().push(event.clone());
    }
}

// ============================================================================
// SECTION: Client Builders
// ============================================================================

/// Builds a client pointed at `server` with the given credentials.
pub fn client_with(
    server: &MockServer,
    api_key: Option<&str>,
    account_id: Option<&str>,
    audit: Arc<dyn ApiAuditSink>,
) -> NewRelicClient {
    NewRelicClient::new(ClientParams {
        http: reqwest::Client::new(),
        endpoints: RegionEndpoints::new(server.rest_base(), server.base.clone()),
        credentials: Credentials::new(
            api_key.map(ToString::to_string),
            account_id.map(ToString::to_string),
        ),
        max_error_body_bytes: 4096,
        audit,
    })
}

/// Builds a client with a test key, default account `1234`, and no auditing.
pub fn client(server: &MockServer) -> NewRelicClient {
    client_with(server, Some("NRAK-TEST"), Some("1234"), Arc::new(NoopAuditSink))
}
