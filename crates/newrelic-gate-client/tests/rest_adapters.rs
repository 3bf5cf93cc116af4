// crates/newrelic-gate-client/tests/rest_adapters.rs
// ============================================================================
// Module: REST Adapter Tests
// Description: End-to-end tests of REST adapters against a recording server.
// Purpose: Validate query serialization, pagination, and local filtering.
// Dependencies: newrelic-gate-client, newrelic-gate-core, tiny_http, tokio
// ============================================================================

//! ## Overview
//! Each test serves canned pages from a local server and checks both the
//! adapter result and the exact requests that reached the server.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;

use newrelic_gate_core::CreateDeploymentArgs;
use newrelic_gate_core::DeleteDeploymentArgs;
use newrelic_gate_core::ErrorKind;
use newrelic_gate_core::GetApplicationArgs;
use newrelic_gate_core::GetMetricDataArgs;
use newrelic_gate_core::ListAlertPoliciesArgs;
use newrelic_gate_core::ListApplicationHostsArgs;
use newrelic_gate_core::ListApplicationsArgs;
use newrelic_gate_core::ListDeploymentsArgs;
use newrelic_gate_core::ListIncidentsArgs;
use newrelic_gate_core::NewRelicError;
use newrelic_gate_core::PageOptions;
use newrelic_gate_core::StopReason;
use serde_json::json;

use crate::common::MockServer;
use crate::common::RecordingAuditSink;
use crate::common::Reply;
use crate::common::client;
use crate::common::client_with;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Paging options that follow every `next` relation.
const ALL_PAGES: PageOptions = PageOptions {
    page: None,
    auto_paginate: true,
};

/// Serves `pages` pages of `per_page` applications, linking each to the next.
fn paged_applications(pages: u64, per_page: u64) -> MockServer {
    MockServer::start(move |request, base| {
        let page: u64 =
            request.query_value("page").map_or(1, |value| value.parse().unwrap());
        let start = (page - 1) * per_page;
        let items: Vec<_> =
            (start..start + per_page).map(|id| json!({"id": id, "name": format!("app-{id}")})).collect();
        let reply = Reply::json(&json!({ "applications": items }));
        if page < pages {
            reply.with_next(&format!("{base}/v2/applications.json?page={}", page + 1))
        } else {
            reply
        }
    })
}

// ============================================================================
// SECTION: Transport
// ============================================================================

#[tokio::test]
async fn api_key_header_is_sent_on_every_call() {
    let server = MockServer::start(|_, _| Reply::json(&json!({"policies": []})));
    client(&server).list_alert_policies(&ListAlertPoliciesArgs::default()).await.unwrap();
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].header("Api-Key"), Some("NRAK-TEST"));
    assert_eq!(requests[0].path(), "/v2/alerts_policies.json");
}

#[tokio::test]
async fn rest_401_is_unauthorized() {
    let server = MockServer::start(|_, _| Reply::status(401, r#"{"error":"bad key"}"#));
    let err = client(&server).list_alert_policies(&ListAlertPoliciesArgs::default()).await;
    let err = err.unwrap_err();
    assert_eq!(err, NewRelicError::Unauthorized);
    assert_eq!(err.to_string(), "Unauthorized: Invalid API key");
}

#[tokio::test]
async fn rest_non_2xx_carries_status_reason_and_body() {
    let server = MockServer::start(|_, _| Reply::status(404, r#"{"error":{"title":"missing"}}"#));
    let err = client(&server)
        .get_application(&GetApplicationArgs {
            application_id: 9,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.to_string(), "REST API error: 404 Not Found");
    let NewRelicError::Transport {
        body, ..
    } = err
    else {
        panic!("expected transport error");
    };
    assert!(body.unwrap().contains("missing"));
}

#[tokio::test]
async fn missing_api_key_fails_without_calling_upstream() {
    let server = MockServer::start(|_, _| Reply::json(&json!({"applications": []})));
    let client = client_with(&server, None, None, Arc::new(newrelic_gate_client::NoopAuditSink));
    let err = client.list_applications(&ListApplicationsArgs::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(server.hits(), 0);
}

// ============================================================================
// SECTION: Applications
// ============================================================================

#[tokio::test]
async fn list_applications_sends_filters_and_page_and_stops_after_one_page() {
    let server = paged_applications(3, 2);
    let args = ListApplicationsArgs {
        filter_host: Some("host1".to_string()),
        filter_language: Some("java".to_string()),
        paging: PageOptions {
            page: Some(5),
            auto_paginate: false,
        },
        ..ListApplicationsArgs::default()
    };
    let items = client(&server).list_applications(&args).await.unwrap();
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.query_value("filter[host]").as_deref(), Some("host1"));
    assert_eq!(request.query_value("filter[language]").as_deref(), Some("java"));
    assert_eq!(request.query_value("page").as_deref(), Some("5"));
    assert!(request.url.contains("filter%5Bhost%5D=host1"));
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn single_page_mode_ignores_present_next_relation() {
    let server = paged_applications(3, 4);
    let items = client(&server).list_applications(&ListApplicationsArgs::default()).await.unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn auto_paginate_concatenates_every_page_in_order() {
    let server = paged_applications(4, 3);
    let args = ListApplicationsArgs {
        paging: ALL_PAGES,
        ..ListApplicationsArgs::default()
    };
    let items = client(&server).list_applications(&args).await.unwrap();
    assert_eq!(items.len(), 12);
    let ids: Vec<u64> = items.iter().map(|item| item["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, (0..12).collect::<Vec<_>>());
    assert_eq!(server.hits(), 4);
    assert!(server.requests()[0].query_value("page").is_none());
}

#[tokio::test]
async fn empty_filter_ids_never_reach_the_query() {
    let server = paged_applications(1, 1);
    let args = ListApplicationsArgs {
        filter_ids: Vec::new(),
        ..ListApplicationsArgs::default()
    };
    client(&server).list_applications(&args).await.unwrap();
    let request = &server.requests()[0];
    assert!(request.query().iter().all(|(key, _)| !key.contains("ids")));
    assert!(request.query().is_empty());
}

#[tokio::test]
async fn get_application_returns_application_object() {
    let server = MockServer::start(|_, _| {
        Reply::json(&json!({"application": {"id": 12, "name": "checkout"}}))
    });
    let application = client(&server)
        .get_application(&GetApplicationArgs {
            application_id: 12,
        })
        .await
        .unwrap();
    assert_eq!(application["name"], "checkout");
    assert_eq!(server.requests()[0].path(), "/v2/applications/12.json");
}

// ============================================================================
// SECTION: Pagination Edge Cases
// ============================================================================

#[tokio::test]
async fn failure_on_later_page_discards_everything() {
    let server = MockServer::start(|request, base| {
        if request.query_value("page").is_some() {
            Reply::status(503, "down")
        } else {
            Reply::json(&json!({"applications": [{"id": 1}]}))
                .with_next(&format!("{base}/v2/applications.json?page=2"))
        }
    });
    let args = ListApplicationsArgs {
        paging: ALL_PAGES,
        ..ListApplicationsArgs::default()
    };
    let err = client(&server).list_applications(&args).await.unwrap_err();
    assert_eq!(err.http_status(), Some(503));
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn repeated_next_link_ends_pagination() {
    let sink = Arc::new(RecordingAuditSink::default());
    let server = MockServer::start(|_, base| {
        Reply::json(&json!({"policies": [{"id": 1}]}))
            .with_next(&format!("{base}/v2/alerts_policies.json?page=2"))
    });
    let client = client_with(&server, Some("NRAK-TEST"), None, sink.clone());
    let args = ListAlertPoliciesArgs {
        filter_name: None,
        paging: ALL_PAGES,
    };
    let items = client.list_alert_policies(&args).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(server.hits(), 2);

    let pages = sink.pages.lock().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].stop_reason, StopReason::RepeatedLink);
    assert_eq!(pages[0].pages, 2);
    let calls = sink.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| !call.path.contains('?')));
}

#[tokio::test]
async fn next_link_with_comma_joined_ids_is_followed() {
    let server = MockServer::start(|request, base| {
        if request.query_value("page").is_some() {
            Reply::json(&json!({"applications": [{"id": 2}]}))
        } else {
            Reply::json(&json!({"applications": [{"id": 1}]}))
                .with_next(&format!("{base}/v2/applications.json?filter[ids]=1,2&page=2"))
        }
    });
    let args = ListApplicationsArgs {
        filter_ids: vec![1, 2],
        paging: ALL_PAGES,
        ..ListApplicationsArgs::default()
    };
    let items = client(&server).list_applications(&args).await.unwrap();
    assert_eq!(items, vec![json!({"id": 1}), json!({"id": 2})]);
    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].query_value("filter[ids]").as_deref(), Some("1,2"));
    assert_eq!(requests[1].query_value("page").as_deref(), Some("2"));
}

#[tokio::test]
async fn next_link_to_another_origin_is_refused() {
    let elsewhere = MockServer::start(|_, _| Reply::json(&json!({"applications": [{"id": 9}]})));
    let target = format!("{}/v2/applications.json?page=2", elsewhere.base);
    let server = MockServer::start(move |_, _| {
        Reply::json(&json!({"applications": [{"id": 1}]})).with_next(&target)
    });
    let args = ListApplicationsArgs {
        paging: ALL_PAGES,
        ..ListApplicationsArgs::default()
    };
    let err = client(&server).list_applications(&args).await.unwrap_err();
    assert!(matches!(err, NewRelicError::MalformedResponse { .. }));
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(server.hits(), 1);
    assert_eq!(elsewhere.hits(), 0);
}

// ============================================================================
// SECTION: Deployments
// ============================================================================

#[tokio::test]
async fn create_deployment_posts_nested_body_once() {
    let server = MockServer::start(|_, _| {
        Reply {
            status: 201,
            body: json!({"deployment": {"id": 77, "revision": "abc123"}}).to_string(),
            headers: Vec::new(),
        }
    });
    let args = CreateDeploymentArgs {
        application_id: 123,
        revision: "abc123".to_string(),
        changelog: Some("notes".to_string()),
        description: None,
        user: None,
    };
    let response = client(&server).create_deployment(&args).await.unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(response.data["deployment"]["id"], 77);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path(), "/v2/applications/123/deployments.json");
    assert_eq!(
        requests[0].json(),
        json!({"deployment": {"revision": "abc123", "changelog": "notes"}})
    );
}

#[tokio::test]
async fn delete_without_confirm_is_refused_locally() {
    let server = MockServer::start(|_, _| Reply::json(&json!({})));
    let args = DeleteDeploymentArgs {
        application_id: 1,
        deployment_id: 2,
        confirm: false,
    };
    let err = client(&server).delete_deployment(&args).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn delete_with_confirm_sends_bodyless_delete() {
    let server = MockServer::start(|_, _| Reply::json(&json!({"deployment": {"id": 2}})));
    let args = DeleteDeploymentArgs {
        application_id: 1,
        deployment_id: 2,
        confirm: true,
    };
    let response = client(&server).delete_deployment(&args).await.unwrap();
    assert_eq!(response.status, 200);
    let requests = server.requests();
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path(), "/v2/applications/1/deployments/2.json");
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn list_deployments_uses_application_path() {
    let server = MockServer::start(|_, _| Reply::json(&json!({"deployments": [{"id": 1}]})));
    let args = ListDeploymentsArgs {
        application_id: 55,
        paging: PageOptions {
            page: Some(2),
            auto_paginate: false,
        },
    };
    let items = client(&server).list_deployments(&args).await.unwrap();
    assert_eq!(items.len(), 1);
    let request = &server.requests()[0];
    assert_eq!(request.path(), "/v2/applications/55/deployments.json");
    assert_eq!(request.query_value("page").as_deref(), Some("2"));
}

// ============================================================================
// SECTION: Metrics
// ============================================================================

#[tokio::test]
async fn metric_data_forwards_every_argument() {
    let server = MockServer::start(|_, _| {
        Reply::json(&json!({"metric_data": {"metrics": [{"name": "Apdex"}]}}))
    });
    let args = GetMetricDataArgs {
        application_id: 1,
        host_id: 2,
        names: vec!["Apdex".to_string(), "HttpDispatcher".to_string()],
        values: vec!["score".to_string()],
        from: Some("2024-01-01T00:00:00+00:00".to_string()),
        to: Some("2024-01-02T00:00:00+00:00".to_string()),
        period: Some(3600),
        summarize: Some(false),
    };
    let data = client(&server).get_metric_data(&args).await.unwrap();
    assert_eq!(data["metrics"][0]["name"], "Apdex");

    let request = &server.requests()[0];
    assert_eq!(request.path(), "/v2/applications/1/hosts/2/metrics/data.json");
    let names: Vec<String> = request
        .query()
        .into_iter()
        .filter(|(key, _)| key == "names[]")
        .map(|(_, value)| value)
        .collect();
    assert_eq!(names, vec!["Apdex", "HttpDispatcher"]);
    assert_eq!(request.query_value("from").as_deref(), Some("2024-01-01T00:00:00+00:00"));
    assert_eq!(request.query_value("period").as_deref(), Some("3600"));
    assert_eq!(request.query_value("summarize").as_deref(), Some("false"));
}

#[tokio::test]
async fn metric_data_without_names_issues_no_call() {
    let server = MockServer::start(|_, _| Reply::json(&json!({})));
    let args = GetMetricDataArgs {
        application_id: 1,
        host_id: 2,
        names: Vec::new(),
        values: Vec::new(),
        from: None,
        to: None,
        period: None,
        summarize: None,
    };
    let err = client(&server).get_metric_data(&args).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn application_hosts_join_ids() {
    let server = MockServer::start(|_, _| Reply::json(&json!({"application_hosts": []})));
    let args = ListApplicationHostsArgs {
        application_id: 4,
        filter_hostname: Some("web-1".to_string()),
        filter_ids: vec![7, 8],
        paging: PageOptions::default(),
    };
    client(&server).list_application_hosts(&args).await.unwrap();
    let request = &server.requests()[0];
    assert_eq!(request.path(), "/v2/applications/4/hosts.json");
    assert_eq!(request.query_value("filter[ids]").as_deref(), Some("7,8"));
    assert_eq!(request.query_value("filter[hostname]").as_deref(), Some("web-1"));
}

// ============================================================================
// SECTION: Incidents
// ============================================================================

#[tokio::test]
async fn only_open_filter_runs_after_all_pages() {
    let server = MockServer::start(|request, base| {
        if request.query_value("page").as_deref() == Some("2") {
            Reply::json(&json!({"incidents": [
                {"id": 3, "closed_at": 0, "priority": "critical"},
                {"id": 4, "closed_at": 1_700_000_000_000_u64, "priority": "critical"}
            ]}))
        } else {
            Reply::json(&json!({"incidents": [
                {"id": 1, "closed_at": 1_700_000_000_000_u64, "priority": "warning"},
                {"id": 2, "closed_at": null, "priority": "warning"}
            ]}))
            .with_next(&format!("{base}/v2/alerts_incidents.json?page=2"))
        }
    });
    let args = ListIncidentsArgs {
        only_open: true,
        priority: None,
        paging: ALL_PAGES,
    };
    let incidents = client(&server).list_incidents(&args).await.unwrap();
    let ids: Vec<u64> = incidents.iter().map(|incident| incident.id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert_eq!(server.hits(), 2);
    assert!(server.requests().iter().all(|request| request.query_value("only_open").is_none()));
}

#[tokio::test]
async fn priority_filter_is_case_sensitive() {
    let server = MockServer::start(|_, _| {
        Reply::json(&json!({"incidents": [
            {"id": 1, "priority": "critical"},
            {"id": 2, "priority": "Critical"}
        ]}))
    });
    let args = ListIncidentsArgs {
        only_open: false,
        priority: Some("critical".to_string()),
        paging: PageOptions::default(),
    };
    let incidents = client(&server).list_incidents(&args).await.unwrap();
    assert_eq!(incidents.len(), 1);
    assert_eq!(incidents[0].id, 1);
    assert!(server.requests()[0].query_value("priority").is_none());
}
