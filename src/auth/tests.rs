//! Tests for the auth module

use super::*;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credential() -> Credential {
    Credential::new("app-id", "s3cr3t", "tenant-1")
}

fn provider(server: &MockServer) -> ClientCredentialsProvider {
    let authority = Url::parse(&format!("{}/", server.uri())).unwrap();
    ClientCredentialsProvider::new(reqwest::Client::new(), authority)
}

/// Provider that always returns a fixed outcome
struct FixedProvider(Option<&'static str>);

#[async_trait]
impl TokenProvider for FixedProvider {
    async fn acquire(&self, _credential: &Credential, _scope: &str) -> Result<TokenState> {
        Ok(match self.0 {
            Some(token) => TokenState::Acquired(AccessToken::new(token, None)),
            None => TokenState::missing("provider returned nothing"),
        })
    }
}

/// Provider that cannot be reached
struct UnreachableProvider;

#[async_trait]
impl TokenProvider for UnreachableProvider {
    async fn acquire(&self, _credential: &Credential, _scope: &str) -> Result<TokenState> {
        Err(Error::Other("connection refused".to_string()))
    }
}

#[test]
fn test_token_url() {
    let provider = ClientCredentialsProvider::new(
        reqwest::Client::new(),
        Url::parse("https://login.microsoftonline.com/").unwrap(),
    );
    assert_eq!(
        provider.token_url("tenant-1").unwrap().as_str(),
        "https://login.microsoftonline.com/tenant-1/oauth2/v2.0/token"
    );
}

#[tokio::test]
async fn test_client_credentials_exchange() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=app-id"))
        .and(body_string_contains("client_secret=s3cr3t"))
        .and(body_string_contains("scope=https%3A%2F%2Fanalysis.windows.net"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "token-abc"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = provider(&mock_server)
        .acquire(&credential(), DEFAULT_SCOPE)
        .await
        .unwrap();

    let token = state.token().expect("token acquired");
    assert_eq!(token.secret(), "token-abc");
    assert!(token.expires_at.is_some());
    assert!(!token.is_expired());
}

#[tokio::test]
async fn test_client_credentials_huge_expires_in() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-abc",
            "expires_in": i64::MAX
        })))
        .mount(&mock_server)
        .await;

    let authenticator =
        Authenticator::acquire(&provider(&mock_server), &credential(), DEFAULT_SCOPE).await;

    let token = authenticator.require_token().unwrap();
    assert_eq!(token.secret(), "token-abc");
    assert_eq!(token.expires_at, None);
}

#[tokio::test]
async fn test_client_credentials_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&mock_server)
        .await;

    let state = provider(&mock_server)
        .acquire(&credential(), DEFAULT_SCOPE)
        .await
        .unwrap();

    match state {
        TokenState::Missing { reason } => {
            assert!(reason.contains("401"));
            assert!(reason.contains("invalid_client"));
            assert!(!reason.contains("s3cr3t"));
        }
        TokenState::Acquired(_) => panic!("Expected missing token"),
    }
}

#[tokio::test]
async fn test_client_credentials_without_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
        .mount(&mock_server)
        .await;

    let state = provider(&mock_server)
        .acquire(&credential(), DEFAULT_SCOPE)
        .await
        .unwrap();

    assert!(!state.is_acquired());
}

#[tokio::test]
async fn test_authenticator_bearer_header() {
    let auth = Authenticator::acquire(&FixedProvider(Some("my-token")), &credential(), DEFAULT_SCOPE)
        .await;

    let headers = auth.auth_headers();
    assert_eq!(headers.len(), 1);
    assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer my-token");
    assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
    assert_eq!(auth.require_token().unwrap().secret(), "my-token");
}

#[tokio::test]
async fn test_authenticator_without_token_builds_empty_headers() {
    let auth = Authenticator::acquire(&FixedProvider(None), &credential(), DEFAULT_SCOPE).await;

    assert!(auth.auth_headers().is_empty());
    assert!(matches!(auth.require_token(), Err(Error::Auth { .. })));
}

#[tokio::test]
async fn test_authenticator_swallows_provider_failure() {
    let auth = Authenticator::acquire(&UnreachableProvider, &credential(), DEFAULT_SCOPE).await;

    assert!(auth.auth_headers().is_empty());
    match auth.state() {
        TokenState::Missing { reason } => assert!(reason.contains("connection refused")),
        TokenState::Acquired(_) => panic!("Expected missing token"),
    }
}
