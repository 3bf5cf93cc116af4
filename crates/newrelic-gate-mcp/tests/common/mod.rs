// crates/newrelic-gate-mcp/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Recording upstream double and router builders.
// Purpose: Drive tool calls end to end against a local HTTP server.
// Dependencies: newrelic-gate-mcp, newrelic-gate-config, tiny_http
// ============================================================================

//! ## Overview
//! [`Upstream`] is a `tiny_http` server on `127.0.0.1:0` that records each
//! request and answers through a route function. [`router_for`] points a
//! [`ToolRouter`] at it through the config endpoint overrides.

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

use newrelic_gate_client::NoopAuditSink;
use newrelic_gate_config::GatewayConfig;
use newrelic_gate_mcp::ToolRouter;
use serde_json::Value;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Upstream Double
// ============================================================================

/// One request as seen by the upstream double.
#[derive(Debug, Clone)]
pub struct Seen {
    /// HTTP method.
    pub method: String,
    /// Path plus query string.
    pub url: String,
    /// `Api-Key` header value.
    pub api_key: Option<String>,
    /// Raw request body.
    pub body: String,
}

impl Seen {
    /// Returns the path without the query string.
    pub fn path(&self) -> &str {
        self.url.split_once('?').map_or(self.url.as_str(), |(path, _)| path)
    }

    /// Returns the first value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<String> {
        let parsed = url::Url::parse(&format!("http://localhost{}", self.url)).unwrap();
        parsed.query_pairs().find(|(name, _)| name == key).map(|(_, value)| value.into_owned())
    }
}

/// Route answer: status, JSON body, and an optional `next` link.
pub struct Answer {
    /// HTTP status.
    pub status: u16,
    /// JSON body.
    pub body: Value,
    /// Absolute `next` URL.
    pub next: Option<String>,
}

impl Answer {
    /// 200 answer with `body`.
    pub const fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body,
            next: None,
        }
    }

    /// Adds a `next` link.
    pub fn with_next(mut self, url: String) -> Self {
        self.next = Some(url);
        self
    }
}

/// Recording upstream HTTP server.
pub struct Upstream {
    /// Base URL, e.g. `http://127.0.0.1:4242`.
    pub base: String,
    /// Requests in arrival order.
    seen: Arc<Mutex<Vec<Seen>>>,
    /// Server handle used to stop the accept loop.
    server: Arc<Server>,
    /// Accept loop thread.
    handle: Option<thread::JoinHandle<()>>,
}

impl Upstream {
    /// Starts a server answering through `route(request, base)`.
    pub fn start<F>(route: F) -> Self
    where
        F: Fn(&Seen, &str) -> Answer + Send + 'static,
    {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let base = format!("http://{}", server.server_addr().to_ip().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let accept = Arc::clone(&server);
        let recorded = Arc::clone(&seen);
        let thread_base = base.clone();
        let handle = thread::spawn(move || {
            for mut request in accept.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let api_key = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Api-Key"))
                    .map(|header| header.value.as_str().to_string());
                let record = Seen {
                    method: request.method().as_str().to_string(),
                    url: request.url().to_string(),
                    api_key,
                    body,
                };
                let answer = route(&record, &thread_base);
                recorded.lock().unwrap().push(record);

                let mut response = Response::from_string(answer.body.to_string())
                    .with_status_code(answer.status)
                    .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
                if let Some(next) = answer.next {
                    let link = format!("<{next}>; rel=\"next\"");
                    response = response.with_header(Header::from_bytes("Link", link).unwrap());
                }
                let _ = request.respond(response);
            }
        });

        Self {
            base,
            seen,
            server,
            handle: Some(handle),
        }
    }

    /// Returns a snapshot of recorded requests.
    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    /// Returns the number of requests received.
    pub fn hits(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl Drop for Upstream {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ============================================================================
// SECTION: Router Builders
// ============================================================================

/// Builds a router pointed at `upstream` with extra `[credentials]` lines.
pub fn router_for(upstream: &Upstream, credentials: &str) -> ToolRouter {
    let toml = format!(
        "[credentials]\n{credentials}\n[endpoints]\nrest_base_url = \"{base}/v2\"\n\
         graphql_base_url = \"{base}\"\n[audit]\nsink = \"none\"\n",
        base = upstream.base
    );
    let config = GatewayConfig::from_toml_str(&toml).unwrap();
    ToolRouter::new(config, reqwest::Client::new(), Arc::new(NoopAuditSink))
}
