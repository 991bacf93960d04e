//! Credentialed HTTP client
//!
//! Provides the request/response cycle against the admin API:
//! - Request descriptors built per call (method, url, headers, query, body)
//! - A [`Transport`] seam so the wire can be swapped in tests
//! - Bearer header injection from the [`Authenticator`]
//! - Body parsing and classification into [`ApiResponse`]
//!
//! No retries and no rate limiting: one call, one request.

use super::envelope::ApiResponse;
use crate::auth::Authenticator;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// A single HTTP request, built once and handed to the transport
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: Method,
    /// Absolute URL, without query
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Query parameters in send order
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl RequestDescriptor {
    /// Create a new request with no headers, query or body
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Merge in a header set
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Add a single header
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of a query parameter, if set
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status, headers and raw body returned by a transport
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Create a raw response
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Create a raw response with a JSON body
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    /// Parse the body and classify the response.
    ///
    /// An empty body parses as `null`. A body that is not JSON is kept as a
    /// string for error statuses and is a decode error for success statuses.
    pub fn into_api_response(self) -> Result<ApiResponse> {
        let body = if self.body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            match serde_json::from_slice(&self.body) {
                Ok(value) => value,
                Err(e) if is_success_status(self.status) => {
                    return Err(Error::decode(self.status, e.to_string()));
                }
                Err(_) => Value::String(String::from_utf8_lossy(&self.body).into_owned()),
            }
        };

        Ok(ApiResponse::classify(self.status, &self.headers, body))
    }
}

fn is_success_status(status: u16) -> bool {
    StatusCode::from_u16(status).is_ok_and(|s| s.is_success())
}

/// Performs HTTP requests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return whatever came back
    async fn send(&self, request: RequestDescriptor) -> Result<RawResponse>;
}

/// [`Transport`] backed by a reqwest client
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Wrap an existing reqwest client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<RawResponse> {
        let mut req = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(Error::Http)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(Error::Http)?.to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Authorized client for one API base URL
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    authenticator: Authenticator,
    base_url: Url,
}

impl ApiClient {
    /// Create a client; `base_url` should end with `/` so paths join under it
    pub fn new(transport: Arc<dyn Transport>, authenticator: Authenticator, base_url: Url) -> Self {
        Self {
            transport,
            authenticator,
            base_url,
        }
    }

    /// The authenticator holding the token
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// API base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                Error::config(format!("API base URL cannot take a path: {}", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Start a request to the endpoint carrying the auth headers
    pub fn request(&self, method: Method, segments: &[&str]) -> Result<RequestDescriptor> {
        Ok(RequestDescriptor::new(method, self.endpoint(segments)?)
            .headers(self.authenticator.auth_headers()))
    }

    /// Send a request and classify the response
    pub async fn perform(&self, request: RequestDescriptor) -> Result<ApiResponse> {
        let method = request.method.clone();
        let url = request.url.clone();

        let raw = self.transport.send(request).await?;
        let response = raw.into_api_response()?;

        debug!(%method, %url, status = response.status(), "admin API call");
        Ok(response)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.authenticator.state().is_acquired())
            .finish_non_exhaustive()
    }
}
