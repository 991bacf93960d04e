//! Admin API operations
//!
//! Endpoint paths are fixed; each operation builds its query from an options
//! struct, sends one request through the [`ApiClient`], and for listings lets
//! the [`PageAggregator`] drive the paging.

use super::options::{ListGroupsOptions, RefreshablesOptions, ReportsOptions, ScanOptions};
use crate::auth::{
    AccessToken, Authenticator, ClientCredentialsProvider, Credential, TokenProvider, TokenState,
};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{ApiClient, ApiResponse, ReqwestTransport, Transport};
use crate::pagination::{Listing, PageAggregator, PageRequest};
use crate::types::{Annotated, LimitWarning, MAX_SCAN_WORKSPACES};
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

const ADMIN: &str = "admin";

/// Client for the Power BI admin REST API
#[derive(Debug, Clone)]
pub struct AdminClient {
    api: ApiClient,
    aggregator: PageAggregator,
}

impl AdminClient {
    /// Authenticate with the default configuration.
    ///
    /// Never fails because of the token exchange; check [`Self::token_state`]
    /// or call [`Self::require_token`] to find out whether it worked.
    pub async fn connect(credential: Credential) -> Result<Self> {
        Self::connect_with(&ClientConfig::default(), credential).await
    }

    /// Authenticate using the endpoints and transport settings in `config`
    pub async fn connect_with(config: &ClientConfig, credential: Credential) -> Result<Self> {
        let http_client = config.http_client()?;
        let provider = ClientCredentialsProvider::new(http_client.clone(), config.authority()?);
        let transport = Arc::new(ReqwestTransport::new(http_client));
        Self::connect_via(config, credential, &provider, transport).await
    }

    /// Authenticate through an explicit identity provider and transport
    pub async fn connect_via(
        config: &ClientConfig,
        credential: Credential,
        provider: &dyn TokenProvider,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let authenticator = Authenticator::acquire(provider, &credential, &config.scope).await;
        if authenticator.state().is_acquired() {
            info!(
                client_id = credential.client_id(),
                tenant_id = credential.tenant_id(),
                "access token acquired"
            );
        }
        let api = ApiClient::new(transport, authenticator, config.api_base()?);
        Ok(Self::from_api(api))
    }

    /// Wrap an already-built API client
    pub fn from_api(api: ApiClient) -> Self {
        Self {
            api,
            aggregator: PageAggregator::default(),
        }
    }

    /// The underlying API client
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Outcome of the token exchange
    pub fn token_state(&self) -> &TokenState {
        self.api.authenticator().state()
    }

    /// The token, or an auth error explaining why there is none
    pub fn require_token(&self) -> Result<&AccessToken> {
        self.api.authenticator().require_token()
    }

    /// Headers sent with every request (empty when unauthenticated)
    pub fn auth_headers(&self) -> HeaderMap {
        self.api.authenticator().auth_headers()
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// List workspaces in the organization
    pub async fn list_groups_as_admin(
        &self,
        options: &ListGroupsOptions,
    ) -> Result<Annotated<Listing>> {
        let extra = options.query_pairs();
        self.list(&[ADMIN, "groups"], &extra, options.page()).await
    }

    /// List refreshable items of one workspace.
    ///
    /// Returns an empty listing without calling the API when no group is set.
    pub async fn list_refreshables_for_group_as_admin(
        &self,
        options: &RefreshablesOptions,
    ) -> Result<Annotated<Listing>> {
        let Some(group) = options.group.as_deref() else {
            return Ok(self.skip_listing(options.page(), "refreshables"));
        };
        let extra = options.query_pairs(group);
        self.list(&[ADMIN, "capacities", "refreshables"], &extra, options.page())
            .await
    }

    /// List reports in one workspace.
    ///
    /// Returns an empty listing without calling the API when no group id is set.
    pub async fn list_reports_for_group_as_admin(
        &self,
        options: &ReportsOptions,
    ) -> Result<Annotated<Listing>> {
        let Some(group_id) = options.group_id.as_deref() else {
            return Ok(self.skip_listing(options.page(), "reports"));
        };
        let extra = options.query_pairs();
        self.list(&[ADMIN, "groups", group_id, "reports"], &extra, options.page())
            .await
    }

    async fn list(
        &self,
        segments: &[&str],
        extra: &[(String, String)],
        page: PageRequest,
    ) -> Result<Annotated<Listing>> {
        let api = &self.api;
        self.aggregator
            .collect(page, move |page| fetch_page(api, segments, extra, page))
            .await
    }

    fn skip_listing(&self, page: PageRequest, what: &str) -> Annotated<Listing> {
        let mut warnings = Vec::new();
        self.aggregator.clamp(page, &mut warnings);
        debug!(listing = what, "no group given, returning empty listing");
        Annotated::new(Listing::empty(), warnings)
    }

    // ========================================================================
    // Workspace scans
    // ========================================================================

    /// Fetch the metadata produced by a finished scan
    pub async fn get_scan_result(&self, scan_id: &str) -> Result<ApiResponse> {
        let request = self
            .api
            .request(Method::GET, &[ADMIN, "workspaces", "scanResult", scan_id])?;
        self.api.perform(request).await
    }

    /// Poll the status of a scan
    pub async fn get_scan_status(&self, scan_id: &str) -> Result<ApiResponse> {
        let request = self
            .api
            .request(Method::GET, &[ADMIN, "workspaces", "scanStatus", scan_id])?;
        self.api.perform(request).await
    }

    /// Start a metadata scan of the given workspaces.
    ///
    /// More than 100 ids raises [`LimitWarning::TooManyWorkspaces`] but the
    /// request is still sent with every id.
    pub async fn start_workspace_scan(
        &self,
        workspace_ids: &[String],
        options: &ScanOptions,
    ) -> Result<Annotated<ApiResponse>> {
        let mut warnings = Vec::new();
        if workspace_ids.len() > MAX_SCAN_WORKSPACES {
            let warning = LimitWarning::TooManyWorkspaces {
                requested: workspace_ids.len(),
                limit: MAX_SCAN_WORKSPACES,
            };
            warning.emit();
            warnings.push(warning);
        }

        let request = self
            .api
            .request(Method::POST, &[ADMIN, "workspaces", "getInfo"])?
            .query_pairs(options.query_pairs())
            .json(json!({ "workspaces": workspace_ids }));
        let response = self.api.perform(request).await?;

        Ok(Annotated::new(response, warnings))
    }
}

/// Fetch one listing page
async fn fetch_page(
    api: &ApiClient,
    segments: &[&str],
    extra: &[(String, String)],
    page: PageRequest,
) -> Result<ApiResponse> {
    let request = api
        .request(Method::GET, segments)?
        .query_pairs(page.query_pairs())
        .query_pairs(extra.iter().cloned());
    api.perform(request).await
}
