// crates/newrelic-gate-client/src/queries.rs
// ============================================================================
// Module: GraphQL Query Builder
// Description: Fixed GraphQL documents and entity-search filter strings.
// Purpose: Keep every query shape and its escaping rules in one place.
// Dependencies: newrelic-gate-core
// ============================================================================

//! ## Overview
//! Identity, account, and entity-search documents are constant and take
//! variables. NRQL is the exception: the query text is embedded into the
//! document with double quotes escaped and nothing else touched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use newrelic_gate_core::NewRelicError;

// ============================================================================
// SECTION: Documents
// ============================================================================

/// Minimal identity lookup.
pub const IDENTITY_QUERY: &str = "query { actor { user { id email name } } }";

/// Account lookup by id.
pub const ACCOUNT_QUERY: &str =
    "query($accountId: Int!) { actor { account(id: $accountId) { id name } } }";

/// Entity search with cursor continuation.
pub const ENTITY_SEARCH_QUERY: &str = "query($query: String!, $cursor: String) { actor { \
     entitySearch(query: $query) { results(cursor: $cursor) { nextCursor entities { guid name \
     entityType domain accountId reporting tags { key values } \
     ... on ApmApplicationEntityOutline { language alertSeverity applicationId } } } } } }";

/// Builds the NRQL document for `account_id`.
#[must_use]
pub fn nrql_document(account_id: u64, nrql: &str) -> String {
    format!(
        "query {{ actor {{ account(id: {account_id}) {{ nrql(query: \"{}\") {{ results metadata \
         {{ eventTypes facets messages timeWindow {{ begin end }} }} }} }} }} }}",
        escape_double_quotes(nrql)
    )
}

// ============================================================================
// SECTION: Entity Search Filters
// ============================================================================

/// Entity-search filter for APM application entities of one account.
#[must_use]
pub fn apm_applications_filter(account_id: u64) -> String {
    format!("domain = 'APM' AND type = 'APPLICATION' AND accountId = {account_id}")
}

/// Entity-search filter for a free-text name fragment.
///
/// # Errors
///
/// Returns [`NewRelicError::Validation`] when the fragment is blank or an
/// entity type is not a bare identifier.
pub fn name_search_filter(
    fragment: &str,
    entity_types: &[String],
    account_id: Option<u64>,
) -> Result<String, NewRelicError> {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return Err(NewRelicError::Validation("search query must not be empty".to_string()));
    }
    let mut clauses = vec![format!("name LIKE '{}'", escape_single_quotes(fragment))];
    if !entity_types.is_empty() {
        let mut types = Vec::with_capacity(entity_types.len());
        for entity_type in entity_types {
            let entity_type = entity_type.trim();
            if entity_type.is_empty()
                || !entity_type.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
            {
                return Err(NewRelicError::Validation(format!(
                    "invalid entity type: '{entity_type}'"
                )));
            }
            types.push(format!("'{}'", entity_type.to_ascii_uppercase()));
        }
        clauses.push(format!("type IN ({})", types.join(", ")));
    }
    if let Some(account_id) = account_id {
        clauses.push(format!("accountId = {account_id}"));
    }
    Ok(clauses.join(" AND "))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a digit-only account id.
///
/// # Errors
///
/// Returns [`NewRelicError::Validation`] when `raw` is empty, has a non-digit,
/// or overflows.
pub fn parse_account_id(raw: &str) -> Result<u64, NewRelicError> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(NewRelicError::Validation(format!("account id must be numeric: '{raw}'")));
    }
    raw.parse()
        .map_err(|_| NewRelicError::Validation(format!("account id out of range: {raw}")))
}

/// Escapes `"` as `\"`.
fn escape_double_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Escapes `'` as `\'`.
fn escape_single_quotes(text: &str) -> String {
    text.replace('\'', "\\'")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
