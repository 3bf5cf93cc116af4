// crates/newrelic-gate-client/src/account.rs
// ============================================================================
// Module: Account and Entity Operations
// Description: Credential check, account lookup, NRQL, and entity search.
// Purpose: Map nested GraphQL responses into flat domain records.
// Dependencies: newrelic-gate-core, serde, serde_json
// ============================================================================

//! ## Overview
//! These operations run over the GraphQL transport. `errors[]` is treated as
//! a failure everywhere except [`NewRelicClient::validate_credentials`], which
//! is a boolean check and turns every failure into `false`.
//!
//! Entity searches follow `nextCursor` until it is absent, repeats, or the
//! requested limit is reached.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use newrelic_gate_core::AccountArgs;
use newrelic_gate_core::AccountDetails;
use newrelic_gate_core::ApiKind;
use newrelic_gate_core::ApmApplication;
use newrelic_gate_core::EntitySummary;
use newrelic_gate_core::EntityTag;
use newrelic_gate_core::NewRelicError;
use newrelic_gate_core::NrqlMetadata;
use newrelic_gate_core::NrqlQueryArgs;
use newrelic_gate_core::NrqlResult;
use newrelic_gate_core::NrqlTimeWindow;
use newrelic_gate_core::SearchEntitiesArgs;
use newrelic_gate_core::heuristics::is_time_series_query;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;

use crate::client::NewRelicClient;
use crate::queries::ACCOUNT_QUERY;
use crate::queries::ENTITY_SEARCH_QUERY;
use crate::queries::IDENTITY_QUERY;
use crate::queries::apm_applications_filter;
use crate::queries::name_search_filter;
use crate::queries::nrql_document;
use crate::queries::parse_account_id;

// ============================================================================
// SECTION: Response Shapes
// ============================================================================

/// `{ actor { ... } }` wrapper.
#[derive(Debug, Deserialize)]
struct ActorData<T> {
    /// Actor node.
    actor: Option<T>,
}

/// Identity lookup payload.
#[derive(Debug, Deserialize)]
struct UserActor {
    /// Current user, when the key resolves to one.
    user: Option<Value>,
}

/// Account lookup payload.
#[derive(Debug, Deserialize)]
struct AccountActor {
    /// Account node; null when the id is unknown.
    account: Option<AccountDetails>,
}

/// NRQL payload.
#[derive(Debug, Deserialize)]
struct NrqlActor {
    /// Account node wrapping the NRQL result.
    account: Option<NrqlAccount>,
}

/// Account node carrying an NRQL result.
#[derive(Debug, Deserialize)]
struct NrqlAccount {
    /// NRQL result node.
    nrql: Option<NrqlNode>,
}

/// Raw NRQL result.
#[derive(Debug, Deserialize)]
struct NrqlNode {
    /// Result rows.
    results: Option<Vec<Value>>,
    /// Result metadata.
    metadata: Option<NrqlMetadataNode>,
}

/// Raw NRQL metadata.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NrqlMetadataNode {
    /// Event types read.
    event_types: Option<Vec<String>>,
    /// Facet names.
    facets: Option<Vec<String>>,
    /// Upstream notices.
    messages: Option<Vec<Value>>,
    /// Query window.
    time_window: Option<NrqlTimeWindow>,
}

/// Entity search payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchActor {
    /// Search node.
    entity_search: Option<EntitySearchNode>,
}

/// Entity search node.
#[derive(Debug, Deserialize)]
struct EntitySearchNode {
    /// One page of results.
    results: Option<EntityPage>,
}

/// One page of entity search results.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityPage {
    /// Cursor for the next page.
    next_cursor: Option<String>,
    /// Entities on this page.
    #[serde(default)]
    entities: Vec<EntityNode>,
}

/// Raw entity outline.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityNode {
    /// Entity GUID.
    guid: String,
    /// Entity name.
    name: String,
    /// Entity type.
    entity_type: Option<String>,
    /// Entity domain.
    domain: Option<String>,
    /// Owning account.
    account_id: Option<u64>,
    /// Reporting flag.
    reporting: Option<bool>,
    /// Raw tags.
    tags: Option<Vec<EntityTag>>,
    /// APM agent language.
    language: Option<String>,
    /// APM alert severity.
    alert_severity: Option<String>,
    /// APM application id.
    application_id: Option<u64>,
}

impl EntityNode {
    /// Flattens this node's tags.
    fn flat_tags(&self) -> BTreeMap<String, String> {
        self.tags.as_deref().map(EntityTag::flatten).unwrap_or_default()
    }

    /// Converts into an APM application record.
    fn into_apm_application(self) -> ApmApplication {
        let tags = self.flat_tags();
        ApmApplication {
            guid: self.guid,
            name: self.name,
            language: self.language,
            reporting: self.reporting,
            alert_severity: self.alert_severity,
            application_id: self.application_id,
            tags,
        }
    }

    /// Converts into a generic entity summary.
    fn into_summary(self) -> EntitySummary {
        let tags = self.flat_tags();
        EntitySummary {
            guid: self.guid,
            name: self.name,
            entity_type: self.entity_type,
            domain: self.domain,
            account_id: self.account_id,
            reporting: self.reporting,
            tags,
        }
    }
}

// ============================================================================
// SECTION: Operations
// ============================================================================

impl NewRelicClient {
    /// Returns true when the API key resolves to a user identity.
    ///
    /// Never fails: network, auth, and decode failures all yield `false`.
    pub async fn validate_credentials(&self) -> bool {
        self.graphql()
            .execute::<ActorData<UserActor>>(IDENTITY_QUERY, None)
            .await
            .ok()
            .and_then(|envelope| envelope.data)
            .and_then(|data| data.actor)
            .and_then(|actor| actor.user)
            .is_some_and(|user| !user.is_null())
    }

    /// Looks up the account named by `args` or the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::Configuration`] when no account id resolves,
    /// [`NewRelicError::Validation`] for a non-numeric id, and
    /// [`NewRelicError::NotFound`] when upstream has no such account.
    pub async fn get_account_details(
        &self,
        args: &AccountArgs,
    ) -> Result<AccountDetails, NewRelicError> {
        let account_id = self.resolve_account(args.account_id.as_deref())?;
        let variables = json!({"accountId": account_id});
        let data: ActorData<AccountActor> =
            self.graphql().execute(ACCOUNT_QUERY, Some(&variables)).await?.into_data()?;
        data.actor
            .and_then(|actor| actor.account)
            .ok_or_else(|| NewRelicError::NotFound(format!("account {account_id}")))
    }

    /// Runs an NRQL query.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::Validation`] before any call for empty NRQL or
    /// a non-numeric account id, and [`NewRelicError::Query`] when upstream
    /// reports query errors.
    pub async fn run_nrql_query(&self, args: &NrqlQueryArgs) -> Result<NrqlResult, NewRelicError> {
        if args.nrql.trim().is_empty() {
            return Err(NewRelicError::Validation("nrql must be a non-empty string".to_string()));
        }
        let account_id = self.resolve_account(args.account_id.as_deref())?;
        let document = nrql_document(account_id, &args.nrql);
        let data: ActorData<NrqlActor> =
            self.graphql().execute(&document, None).await?.into_data()?;
        let node = data
            .actor
            .and_then(|actor| actor.account)
            .ok_or_else(|| NewRelicError::NotFound(format!("account {account_id}")))?
            .nrql
            .ok_or_else(|| NewRelicError::MalformedResponse {
                api: ApiKind::Graphql,
                message: "response has no nrql result".to_string(),
            })?;
        let metadata = node.metadata.unwrap_or_default();
        Ok(NrqlResult {
            results: node.results.unwrap_or_default(),
            metadata: NrqlMetadata {
                event_types: metadata.event_types.unwrap_or_default(),
                facets: metadata.facets.unwrap_or_default(),
                messages: metadata.messages.unwrap_or_default(),
                time_window: metadata.time_window,
                time_series: is_time_series_query(&args.nrql),
            },
        })
    }

    /// Lists APM application entities of an account.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError`] for account resolution or query failures.
    pub async fn list_apm_applications(
        &self,
        args: &AccountArgs,
    ) -> Result<Vec<ApmApplication>, NewRelicError> {
        let account_id = self.resolve_account(args.account_id.as_deref())?;
        let nodes = self.entity_search(&apm_applications_filter(account_id), None).await?;
        Ok(nodes.into_iter().map(EntityNode::into_apm_application).collect())
    }

    /// Searches entities by name fragment.
    ///
    /// The account filter uses the explicit id, then the configured default,
    /// and is omitted when neither is set.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::Validation`] for a blank fragment, bad entity
    /// types, a zero limit, or a non-numeric account id.
    pub async fn search_entities(
        &self,
        args: &SearchEntitiesArgs,
    ) -> Result<Vec<EntitySummary>, NewRelicError> {
        let limit = match args.limit {
            Some(0) => {
                return Err(NewRelicError::Validation("limit must be at least 1".to_string()));
            }
            Some(limit) => Some(usize::try_from(limit).unwrap_or(usize::MAX)),
            None => None,
        };
        let account_id = args
            .account_id
            .as_deref()
            .or_else(|| self.credentials().default_account_id())
            .map(parse_account_id)
            .transpose()?;
        let filter = name_search_filter(&args.query, &args.entity_types, account_id)?;
        let nodes = self.entity_search(&filter, limit).await?;
        Ok(nodes.into_iter().map(EntityNode::into_summary).collect())
    }

    /// Resolves and validates the effective account id.
    fn resolve_account(&self, explicit: Option<&str>) -> Result<u64, NewRelicError> {
        parse_account_id(&self.credentials().resolve_account_id(explicit)?)
    }

    /// Runs an entity search across cursor pages.
    async fn entity_search(
        &self,
        filter: &str,
        limit: Option<usize>,
    ) -> Result<Vec<EntityNode>, NewRelicError> {
        let mut entities = Vec::new();
        let mut seen = BTreeSet::new();
        let mut cursor: Option<String> = None;
        loop {
            let variables = json!({"query": filter, "cursor": cursor});
            let page = self.entity_page(&variables).await?;
            entities.extend(page.entities);
            if limit.is_some_and(|limit| entities.len() >= limit) {
                break;
            }
            match page.next_cursor {
                Some(next) if seen.insert(next.clone()) => cursor = Some(next),
                _ => break,
            }
        }
        if let Some(limit) = limit {
            entities.truncate(limit);
        }
        Ok(entities)
    }

    /// Fetches one entity search page; a null result is an empty page.
    async fn entity_page(&self, variables: &Value) -> Result<EntityPage, NewRelicError> {
        let data: ActorData<SearchActor> =
            self.graphql().execute(ENTITY_SEARCH_QUERY, Some(variables)).await?.into_data()?;
        Ok(data
            .actor
            .and_then(|actor| actor.entity_search)
            .and_then(|search| search.results)
            .unwrap_or_default())
    }
}
