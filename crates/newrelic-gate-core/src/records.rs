// crates/newrelic-gate-core/src/records.rs
// ============================================================================
// Module: Domain Records
// Description: Flat result records produced by the adapters.
// Purpose: Give GraphQL and REST results stable, caller-facing shapes.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! GraphQL responses are deeply nested; the adapters map them into the flat
//! records defined here. Incident records stay close to the upstream JSON
//! because they are filtered locally and otherwise returned untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Account
// ============================================================================

/// Account identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    /// Numeric account id.
    pub id: u64,
    /// Account display name.
    pub name: String,
}

// ============================================================================
// SECTION: NRQL
// ============================================================================

/// Query window reported by NRQL metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NrqlTimeWindow {
    /// Window start in epoch milliseconds.
    pub begin: Option<i64>,
    /// Window end in epoch milliseconds.
    pub end: Option<i64>,
}

/// NRQL result metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NrqlMetadata {
    /// Event types the query read.
    #[serde(default)]
    pub event_types: Vec<String>,
    /// Facet attribute names.
    #[serde(default)]
    pub facets: Vec<String>,
    /// Upstream notices about the query.
    #[serde(default)]
    pub messages: Vec<Value>,
    /// Query window, when reported.
    #[serde(default)]
    pub time_window: Option<NrqlTimeWindow>,
    /// True when the query text asks for a time series.
    pub time_series: bool,
}

/// NRQL rows plus metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NrqlResult {
    /// Result rows as returned upstream.
    pub results: Vec<Value>,
    /// Query metadata.
    pub metadata: NrqlMetadata,
}

// ============================================================================
// SECTION: Entities
// ============================================================================

/// Raw entity tag: one key with any number of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTag {
    /// Tag key.
    pub key: String,
    /// Tag values.
    #[serde(default)]
    pub values: Vec<String>,
}

impl EntityTag {
    /// Flattens tags into a single-valued map.
    ///
    /// The first value wins for each key; tags without values are dropped.
    #[must_use]
    pub fn flatten(tags: &[Self]) -> BTreeMap<String, String> {
        let mut flat = BTreeMap::new();
        for tag in tags {
            if let Some(first) = tag.values.first() {
                flat.entry(tag.key.clone()).or_insert_with(|| first.clone());
            }
        }
        flat
    }
}

/// APM application entity from the entity search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApmApplication {
    /// Entity GUID.
    pub guid: String,
    /// Application name.
    pub name: String,
    /// Agent language.
    pub language: Option<String>,
    /// True when the application is currently reporting.
    pub reporting: Option<bool>,
    /// Current alert severity.
    pub alert_severity: Option<String>,
    /// Numeric REST application id.
    pub application_id: Option<u64>,
    /// Flattened tags.
    pub tags: BTreeMap<String, String>,
}

/// Generic entity from a free-text search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    /// Entity GUID.
    pub guid: String,
    /// Entity name.
    pub name: String,
    /// Entity type (`APPLICATION`, `HOST`, ...).
    pub entity_type: Option<String>,
    /// Entity domain (`APM`, `INFRA`, ...).
    pub domain: Option<String>,
    /// Owning account id.
    pub account_id: Option<u64>,
    /// True when the entity is currently reporting.
    pub reporting: Option<bool>,
    /// Flattened tags.
    pub tags: BTreeMap<String, String>,
}

// ============================================================================
// SECTION: Alert Incidents
// ============================================================================

/// Alert incident as returned by the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertIncident {
    /// Incident id.
    pub id: u64,
    /// Open time in epoch milliseconds.
    #[serde(default)]
    pub opened_at: Option<Value>,
    /// Close time; absent, null, zero, or empty while open.
    #[serde(default)]
    pub closed_at: Option<Value>,
    /// Incident priority (`critical`, `warning`, ...).
    #[serde(default)]
    pub priority: Option<String>,
    /// Remaining upstream fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl AlertIncident {
    /// Returns true when `closed_at` is falsy.
    #[must_use]
    pub fn is_open(&self) -> bool {
        match &self.closed_at {
            None | Some(Value::Null) => true,
            Some(Value::Bool(closed)) => !closed,
            Some(Value::Number(number)) => {
                number.as_f64().is_some_and(|value| value.abs() < f64::EPSILON)
            }
            Some(Value::String(text)) => text.is_empty(),
            Some(Value::Array(_) | Value::Object(_)) => false,
        }
    }

    /// Returns true when `priority` equals `wanted` exactly.
    #[must_use]
    pub fn has_priority(&self, wanted: &str) -> bool {
        self.priority.as_deref() == Some(wanted)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
