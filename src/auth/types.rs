//! Auth types
//!
//! The service-principal credential, the bearer token acquired with it,
//! and the explicit record of whether acquisition worked.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Default OAuth2 scope for the Power BI REST API
pub const DEFAULT_SCOPE: &str = "https://analysis.windows.net/powerbi/api/.default";

/// Service principal credential used for the client credentials grant
#[derive(Clone)]
pub struct Credential {
    client_id: String,
    client_secret: SecretString,
    tenant_id: String,
}

impl Credential {
    /// Create a new credential. No local validation is performed.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            tenant_id: tenant_id.into(),
        }
    }

    /// Application (client) id of the service principal
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Directory (tenant) id
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// Bearer token with the expiry reported by the identity provider
#[derive(Clone)]
pub struct AccessToken {
    token: SecretString,
    /// When the token expires, if the provider said so
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a new access token
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            expires_at,
        }
    }

    /// Create a token that expires in N seconds from now.
    ///
    /// An offset outside the representable range leaves the expiry unknown.
    pub fn expires_in(token: impl Into<String>, seconds: i64) -> Self {
        let expires_at = chrono::Duration::try_seconds(seconds)
            .and_then(|offset| Utc::now().checked_add_signed(offset));
        Self::new(token, expires_at)
    }

    /// The raw bearer value
    pub fn secret(&self) -> &str {
        self.token.expose_secret()
    }

    /// Check if the token is past its reported expiry.
    ///
    /// Informational only: the client never renews tokens.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Outcome of the token exchange performed at construction
#[derive(Debug, Clone)]
pub enum TokenState {
    /// The identity provider issued a token
    Acquired(AccessToken),
    /// No usable token; requests go out without authorization
    Missing {
        /// Why the exchange produced nothing
        reason: String,
    },
}

impl TokenState {
    /// Create a missing state
    pub fn missing(reason: impl Into<String>) -> Self {
        Self::Missing {
            reason: reason.into(),
        }
    }

    /// The token, if one was acquired
    pub fn token(&self) -> Option<&AccessToken> {
        match self {
            Self::Acquired(token) => Some(token),
            Self::Missing { .. } => None,
        }
    }

    /// Check if a token was acquired
    pub fn is_acquired(&self) -> bool {
        matches!(self, Self::Acquired(_))
    }
}
