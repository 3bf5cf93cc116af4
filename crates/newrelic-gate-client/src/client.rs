// crates/newrelic-gate-client/src/client.rs
// ============================================================================
// Module: New Relic Client
// Description: Facade pairing the REST and GraphQL transports for one caller.
// Purpose: Give every adapter one entry point and one pagination path.
// Dependencies: newrelic-gate-core, reqwest, serde
// ============================================================================

//! ## Overview
//! A [`NewRelicClient`] is cheap to build per call: it clones a shared
//! [`reqwest::Client`] handle and owns only immutable credentials and
//! endpoints. Adapter operations are implemented on it in the per-family
//! modules; REST list operations all go through [`NewRelicClient::list`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use newrelic_gate_core::Credentials;
use newrelic_gate_core::NewRelicError;
use newrelic_gate_core::PageOptions;
use newrelic_gate_core::Paged;
use newrelic_gate_core::QueryParams;
use newrelic_gate_core::Region;
use newrelic_gate_core::RegionEndpoints;
use newrelic_gate_core::collect_pages;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::audit::ApiAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::PaginationAuditEvent;
use crate::graphql::GraphqlClient;
use crate::rest::RestClient;
use crate::settings::HttpSettings;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Inputs required to construct a client.
pub struct ClientParams {
    /// Shared HTTP client.
    pub http: Client,
    /// REST and GraphQL base URLs.
    pub endpoints: RegionEndpoints,
    /// Credentials for every call.
    pub credentials: Credentials,
    /// Cap on captured error bodies.
    pub max_error_body_bytes: usize,
    /// Audit sink for call and pagination events.
    pub audit: Arc<dyn ApiAuditSink>,
}

/// REST plus GraphQL client for one credential set.
#[derive(Clone)]
pub struct NewRelicClient {
    /// REST v2 transport.
    rest: RestClient,
    /// GraphQL transport.
    graphql: GraphqlClient,
    /// Audit sink for pagination events.
    audit: Arc<dyn ApiAuditSink>,
}

impl NewRelicClient {
    /// Creates a client from explicit parts.
    #[must_use]
    pub fn new(params: ClientParams) -> Self {
        let rest = RestClient::new(
            params.http.clone(),
            params.endpoints.rest_base_url.clone(),
            params.credentials.clone(),
            params.max_error_body_bytes,
            Arc::clone(&params.audit),
        );
        let graphql = GraphqlClient::new(
            params.http,
            params.endpoints.graphql_endpoint(),
            params.credentials,
            params.max_error_body_bytes,
            Arc::clone(&params.audit),
        );
        Self {
            rest,
            graphql,
            audit: params.audit,
        }
    }

    /// Creates a client for `region` with its own HTTP client and no auditing.
    ///
    /// # Errors
    ///
    /// Returns [`NewRelicError::Configuration`] when the HTTP client cannot be built.
    pub fn for_region(
        region: Region,
        credentials: Credentials,
        settings: &HttpSettings,
    ) -> Result<Self, NewRelicError> {
        Ok(Self::new(ClientParams {
            http: settings.build_client()?,
            endpoints: region.endpoints(),
            credentials,
            max_error_body_bytes: settings.max_error_body_bytes,
            audit: Arc::new(NoopAuditSink),
        }))
    }

    /// Returns the REST transport.
    #[must_use]
    pub const fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Returns the GraphQL transport.
    #[must_use]
    pub const fn graphql(&self) -> &GraphqlClient {
        &self.graphql
    }

    /// Returns the credentials used by this client.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        self.graphql.credentials()
    }

    /// Runs a REST list: fetches the first page, then follows `next`
    /// relations when `paging` asks for every page.
    ///
    /// `key` names the array inside each page body.
    ///
    /// # Errors
    ///
    /// Returns the first page failure; nothing gathered before it is returned.
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
        mut query: QueryParams,
        paging: PageOptions,
    ) -> Result<Paged<T>, NewRelicError> {
        query.push_opt("page", paging.requested_page());
        let first = self.rest.get(path, &query).await?.into_items::<T>(key)?;
        let rest = &self.rest;
        let paged = collect_pages(first, paging.mode(), move |url| async move {
            rest.get_url(&url).await?.into_items::<T>(key)
        })
        .await?;
        self.audit.record_pagination(&PaginationAuditEvent::new(
            path,
            paged.pages,
            paged.items.len(),
            paged.stop_reason,
        ));
        Ok(paged)
    }
}
