// crates/newrelic-gate-client/src/audit/tests.rs
// ============================================================================
// Module: API Audit Logging Tests
// Description: Unit tests for audit event construction and file sinks.
// Purpose: Ensure events stay redacted and file sinks append JSON lines.
// Dependencies: newrelic-gate-client, tempfile
// ============================================================================

//! ## Overview
//! Covers event classification and the append-only file sink.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use newrelic_gate_core::ApiKind;
use newrelic_gate_core::NewRelicError;
use newrelic_gate_core::StopReason;
use serde_json::Value;

use super::ApiAuditEvent;
use super::ApiAuditSink;
use super::CallOutcome;
use super::FileAuditSink;
use super::PaginationAuditEvent;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn error_events_carry_kind_and_status() {
    let err = NewRelicError::status(ApiKind::Rest, 503, "Service Unavailable", None);
    let event = ApiAuditEvent::new(
        ApiKind::Rest,
        "GET",
        "/v2/applications.json",
        Err(&err),
        Duration::from_millis(12),
    );
    assert_eq!(event.outcome, CallOutcome::Error);
    assert_eq!(event.status, Some(503));
    assert_eq!(event.error_kind, Some("transport"));
    assert_eq!(event.duration_ms, 12);
}

#[test]
fn unauthorized_events_report_401() {
    let event = ApiAuditEvent::new(
        ApiKind::Graphql,
        "POST",
        "/graphql",
        Err(&NewRelicError::Unauthorized),
        Duration::ZERO,
    );
    assert_eq!(event.status, Some(401));
    assert_eq!(event.error_kind, Some("auth"));
}

#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let sink = FileAuditSink::new(&path).unwrap();
    sink.record(&ApiAuditEvent::new(
        ApiKind::Rest,
        "GET",
        "/v2/alerts_incidents.json",
        Ok(200),
        Duration::from_millis(3),
    ));
    sink.record_pagination(&PaginationAuditEvent::new(
        "/v2/alerts_incidents.json",
        3,
        75,
        StopReason::Exhausted,
    ));

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "newrelic_api_call");
    assert_eq!(lines[0]["api"], "rest");
    assert_eq!(lines[0]["outcome"], "ok");
    assert_eq!(lines[1]["stop_reason"], "exhausted");
    assert_eq!(lines[1]["items"], 75);
}
