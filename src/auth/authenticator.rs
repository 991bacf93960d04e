//! Authenticator implementation
//!
//! Acquires a bearer token once via the OAuth2 client credentials grant and
//! turns it into request headers. There is no refresh: a stale token simply
//! produces remote authorization errors.

use super::types::{AccessToken, Credential, TokenState};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// Identity provider capable of exchanging a credential for a bearer token
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Exchange the credential for a token scoped to `scope`.
    ///
    /// `Ok(TokenState::Missing)` means the provider answered but issued no
    /// usable token; `Err` means the provider could not be reached.
    async fn acquire(&self, credential: &Credential, scope: &str) -> Result<TokenState>;
}

/// Client credentials grant against a Microsoft identity platform authority
#[derive(Debug, Clone)]
pub struct ClientCredentialsProvider {
    http_client: Client,
    authority_url: Url,
}

impl ClientCredentialsProvider {
    /// Create a provider for the given authority (e.g. `https://login.microsoftonline.com/`)
    pub fn new(http_client: Client, authority_url: Url) -> Self {
        Self {
            http_client,
            authority_url,
        }
    }

    /// Token endpoint for a tenant
    pub fn token_url(&self, tenant_id: &str) -> Result<Url> {
        Ok(self
            .authority_url
            .join(&format!("{tenant_id}/oauth2/v2.0/token"))?)
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn acquire(&self, credential: &Credential, scope: &str) -> Result<TokenState> {
        let token_url = self.token_url(credential.tenant_id())?;
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credential.client_id()),
            ("client_secret", credential.client_secret()),
            ("scope", scope),
        ];

        debug!(url = %token_url, client_id = credential.client_id(), "requesting token");

        let response = self
            .http_client
            .post(token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;
        let token_response: TokenResponse = serde_json::from_str(&body).unwrap_or_default();

        if !status.is_success() {
            return Ok(TokenState::missing(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                token_response.describe_error()
            )));
        }

        Ok(token_response.into_state())
    }
}

/// Holds the token acquired at construction and builds auth headers from it
#[derive(Debug, Clone)]
pub struct Authenticator {
    state: TokenState,
}

impl Authenticator {
    /// Run the token exchange once. Never fails: an unreachable or refusing
    /// provider yields a tokenless authenticator.
    pub async fn acquire(
        provider: &dyn TokenProvider,
        credential: &Credential,
        scope: &str,
    ) -> Self {
        let state = match provider.acquire(credential, scope).await {
            Ok(state) => state,
            Err(e) => TokenState::missing(e.to_string()),
        };

        if let TokenState::Missing { reason } = &state {
            warn!(
                client_id = credential.client_id(),
                tenant_id = credential.tenant_id(),
                %reason,
                "no access token acquired, requests will be unauthenticated"
            );
        }

        Self { state }
    }

    /// Create an authenticator from a known state
    pub fn from_state(state: TokenState) -> Self {
        Self { state }
    }

    /// Outcome of the token exchange
    pub fn state(&self) -> &TokenState {
        &self.state
    }

    /// The token, or an auth error explaining why there is none
    pub fn require_token(&self) -> Result<&AccessToken> {
        match &self.state {
            TokenState::Acquired(token) => Ok(token),
            TokenState::Missing { reason } => Err(Error::auth(reason.clone())),
        }
    }

    /// `Authorization: Bearer <token>` when a token is present, otherwise empty
    pub fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let TokenState::Acquired(token) = &self.state {
            match HeaderValue::from_str(&format!("Bearer {}", token.secret())) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("access token is not a valid header value, omitting"),
            }
        }
        headers
    }
}

/// OAuth2 token endpoint response (success or error body)
#[derive(Debug, Default, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl TokenResponse {
    fn describe_error(&self) -> String {
        match (&self.error, &self.error_description) {
            (Some(code), Some(description)) => format!("{code}: {description}"),
            (Some(code), None) => code.clone(),
            (None, Some(description)) => description.clone(),
            (None, None) => "no error detail".to_string(),
        }
    }

    fn into_state(self) -> TokenState {
        match self.access_token {
            Some(token) if !token.is_empty() => match self.expires_in {
                Some(secs) => TokenState::Acquired(AccessToken::expires_in(token, secs)),
                None => TokenState::Acquired(AccessToken::new(token, None)),
            },
            _ => TokenState::missing(format!(
                "token response has no access_token ({})",
                self.describe_error()
            )),
        }
    }
}
