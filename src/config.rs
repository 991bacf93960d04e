//! Client configuration
//!
//! Endpoints, scope and transport settings, loadable from YAML. Credentials
//! come from the config file or from `PBI_CLIENT_ID`, `PBI_CLIENT_SECRET`
//! and `PBI_TENANT_ID`.

use crate::auth::{Credential, DEFAULT_SCOPE};
use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default admin API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.powerbi.com/v1.0/myorg/";

/// Default identity provider authority
pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com/";

/// Environment variable holding the client id
pub const ENV_CLIENT_ID: &str = "PBI_CLIENT_ID";

/// Environment variable holding the client secret
pub const ENV_CLIENT_SECRET: &str = "PBI_CLIENT_SECRET";

/// Environment variable holding the tenant id
pub const ENV_TENANT_ID: &str = "PBI_TENANT_ID";

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL the admin endpoint paths are appended to
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Identity provider authority; the tenant id is appended to it
    #[serde(default = "default_authority_url")]
    pub authority_url: String,

    /// OAuth2 scope requested for the token
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Service principal credentials
    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_authority_url() -> String {
    DEFAULT_AUTHORITY_URL.to_string()
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("pbi-admin/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            authority_url: default_authority_url(),
            scope: default_scope(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
            credentials: None,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Parsed API base URL, with a trailing slash
    pub fn api_base(&self) -> Result<Url> {
        parse_base(&self.api_base_url)
    }

    /// Parsed authority URL, with a trailing slash
    pub fn authority(&self) -> Result<Url> {
        parse_base(&self.authority_url)
    }

    /// Build the reqwest client used for both token and API calls
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout())
            .user_agent(&self.user_agent)
            .build()?)
    }

    /// Resolve credentials from this config, falling back to the environment
    pub fn resolve_credential(&self) -> Result<Credential> {
        match &self.credentials {
            Some(credentials) => Ok(credentials.to_credential()),
            None => credential_from_env(),
        }
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Read credentials from `PBI_CLIENT_ID`, `PBI_CLIENT_SECRET`, `PBI_TENANT_ID`
pub fn credential_from_env() -> Result<Credential> {
    let var = |name: &str| std::env::var(name).map_err(|_| Error::missing_field(name));
    Ok(Credential::new(
        var(ENV_CLIENT_ID)?,
        var(ENV_CLIENT_SECRET)?,
        var(ENV_TENANT_ID)?,
    ))
}

// ============================================================================
// Credentials
// ============================================================================

/// Credentials section of the config file
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Application (client) id
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Directory (tenant) id
    pub tenant_id: String,
}

impl CredentialsConfig {
    /// Convert to a runtime credential
    pub fn to_credential(&self) -> Credential {
        Credential::new(&self.client_id, &self.client_secret, &self.tenant_id)
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    /// Set the identity provider authority
    pub fn authority_url(mut self, url: impl Into<String>) -> Self {
        self.config.authority_url = url.into();
        self
    }

    /// Set the OAuth2 scope
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.config.scope = scope.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_seconds = timeout.as_secs();
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set credentials
    pub fn credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Self {
        self.config.credentials = Some(CredentialsConfig {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            tenant_id: tenant_id.into(),
        });
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
