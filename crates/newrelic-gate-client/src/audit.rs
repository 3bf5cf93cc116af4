// crates/newrelic-gate-client/src/audit.rs
// ============================================================================
// Module: API Audit Logging
// Description: Structured audit events for upstream REST and GraphQL calls.
// Purpose: Emit redacted per-call and per-list records without a log framework.
// Dependencies: newrelic-gate-core, serde
// ============================================================================

//! ## Overview
//! Every transport call produces one [`ApiAuditEvent`] and every paginated
//! list produces one [`PaginationAuditEvent`]. Events carry the URL path only;
//! query strings and the API key never reach a sink. Sinks swallow their own
//! I/O failures so auditing never fails an operation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use newrelic_gate_core::ApiKind;
use newrelic_gate_core::NewRelicError;
use newrelic_gate_core::StopReason;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result classification for one upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    /// 2xx response decoded successfully.
    Ok,
    /// Any failure.
    Error,
}

/// Upstream call audit event.
#[derive(Debug, Clone, Serialize)]
pub struct ApiAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// API family called.
    pub api: ApiKind,
    /// HTTP method.
    pub method: String,
    /// Request URL path without the query string.
    pub path: String,
    /// HTTP status when a response arrived.
    pub status: Option<u16>,
    /// Call outcome.
    pub outcome: CallOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Wall time spent on the call.
    pub duration_ms: u128,
}

impl ApiAuditEvent {
    /// Builds an event from a finished call.
    #[must_use]
    pub fn new(
        api: ApiKind,
        method: &str,
        path: &str,
        result: Result<u16, &NewRelicError>,
        elapsed: Duration,
    ) -> Self {
        let (status, outcome, error_kind) = match result {
            Ok(status) => (Some(status), CallOutcome::Ok, None),
            Err(err) => (err.http_status(), CallOutcome::Error, Some(err.kind().as_str())),
        };
        Self {
            event: "newrelic_api_call",
            timestamp_ms: now_ms(),
            api,
            method: method.to_string(),
            path: path.to_string(),
            status,
            outcome,
            error_kind,
            duration_ms: elapsed.as_millis(),
        }
    }
}

/// Paginated list audit event.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Path of the first page.
    pub path: String,
    /// Pages fetched.
    pub pages: usize,
    /// Items materialized before local filtering.
    pub items: usize,
    /// Why fetching stopped.
    pub stop_reason: StopReason,
}

impl PaginationAuditEvent {
    /// Builds an event for a completed list.
    #[must_use]
    pub fn new(path: &str, pages: usize, items: usize, stop_reason: StopReason) -> Self {
        Self {
            event: "newrelic_pagination",
            timestamp_ms: now_ms(),
            path: path.to_string(),
            pages,
            items,
            stop_reason,
        }
    }
}

/// Returns the current wall-clock time in epoch milliseconds.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for upstream call events.
pub trait ApiAuditSink: Send + Sync {
    /// Records an upstream call.
    fn record(&self, event: &ApiAuditEvent);

    /// Records a completed paginated list.
    fn record_pagination(&self, _event: &PaginationAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Writes one serialized event line to stderr.
    fn emit(event: &impl Serialize) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

impl ApiAuditSink for StderrAuditSink {
    fn record(&self, event: &ApiAuditEvent) {
        Self::emit(event);
    }

    fn record_pagination(&self, event: &PaginationAuditEvent) {
        Self::emit(event);
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event line.
    fn emit(&self, event: &impl Serialize) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl ApiAuditSink for FileAuditSink {
    fn record(&self, event: &ApiAuditEvent) {
        self.emit(event);
    }

    fn record_pagination(&self, event: &PaginationAuditEvent) {
        self.emit(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ApiAuditSink for NoopAuditSink {
    fn record(&self, _event: &ApiAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
