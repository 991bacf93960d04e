//! Response classification
//!
//! Every admin API response is normalized into [`ApiResponse`], so callers
//! match on variants instead of probing the body for fields.

use regex::Regex;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;

/// Field holding the result items of a listing page
pub const ITEMS_FIELD: &str = "value";

/// Field holding the server-reported total item count
pub const COUNT_FIELD: &str = "@odata.count";

/// Marker the API puts in quota-exhaustion bodies
const QUOTA_MARKER: &str = "exceeded";

/// Regex for the wait hint in quota messages: "Try again in 13 seconds."
static RETRY_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)try again in (\d+) seconds?").unwrap());

/// A successful response body together with its HTTP status
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body (`null` when the body was empty)
    pub body: Value,
}

impl Envelope {
    /// Create a new envelope
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// The `value` array, if present
    pub fn items(&self) -> Option<&Vec<Value>> {
        self.body.get(ITEMS_FIELD).and_then(Value::as_array)
    }

    /// The `@odata.count` total, if present and numeric
    pub fn total_count(&self) -> Option<usize> {
        self.body
            .get(COUNT_FIELD)
            .and_then(Value::as_u64)
            .map(|n| n as usize)
    }

    /// Items and total count, when this envelope is a listing page
    pub fn page(&self) -> Option<(&[Value], usize)> {
        Some((self.items()?.as_slice(), self.total_count()?))
    }

    /// Take ownership of the `value` array (empty if absent)
    pub fn into_items(self) -> Vec<Value> {
        match self.body {
            Value::Object(mut map) => match map.remove(ITEMS_FIELD) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

/// Normalized outcome of one admin API call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 2xx response
    Success(Envelope),

    /// Non-2xx response
    Error {
        /// HTTP status code
        status: u16,
        /// Message extracted from the body, or the status reason
        message: String,
        /// Parsed body
        body: Value,
    },

    /// Request quota exhausted
    RateLimited {
        /// HTTP status code
        status: u16,
        /// How long the API asked us to wait, when it said so
        retry_after: Option<Duration>,
        /// Parsed body
        body: Value,
    },
}

impl ApiResponse {
    /// Classify a response from its status, headers and parsed body
    pub fn classify(status: u16, headers: &HeaderMap, body: Value) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS.as_u16() || signals_quota(&body) {
            let retry_after = retry_after_header(headers).or_else(|| {
                extract_message(&body).and_then(|message| retry_hint(&message))
            });
            return Self::RateLimited {
                status,
                retry_after,
                body,
            };
        }

        if (200..300).contains(&status) {
            return Self::Success(Envelope::new(status, body));
        }

        let message = extract_message(&body).unwrap_or_else(|| {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown status")
                .to_string()
        });
        Self::Error {
            status,
            message,
            body,
        }
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        match self {
            Self::Success(envelope) => envelope.status,
            Self::Error { status, .. } | Self::RateLimited { status, .. } => *status,
        }
    }

    /// Check if this is a success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The success envelope, if any
    pub fn as_success(&self) -> Option<&Envelope> {
        match self {
            Self::Success(envelope) => Some(envelope),
            _ => None,
        }
    }

    /// Parsed body, whatever the variant
    pub fn body(&self) -> &Value {
        match self {
            Self::Success(envelope) => &envelope.body,
            Self::Error { body, .. } | Self::RateLimited { body, .. } => body,
        }
    }

    /// Take the parsed body
    pub fn into_body(self) -> Value {
        match self {
            Self::Success(envelope) => envelope.body,
            Self::Error { body, .. } | Self::RateLimited { body, .. } => body,
        }
    }

    /// One-line description for logs and errors
    pub fn summary(&self) -> String {
        match self {
            Self::Success(envelope) => format!("HTTP {}", envelope.status),
            Self::Error {
                status, message, ..
            } => format!("HTTP {status}: {message}"),
            Self::RateLimited {
                status,
                retry_after: Some(wait),
                ..
            } => format!("HTTP {status}: rate limited, retry after {}s", wait.as_secs()),
            Self::RateLimited { status, .. } => format!("HTTP {status}: rate limited"),
        }
    }
}

/// Check a body for the quota-exhaustion marker
fn signals_quota(body: &Value) -> bool {
    match body {
        Value::String(text) => text.contains(QUOTA_MARKER),
        Value::Object(map) => map.contains_key(QUOTA_MARKER),
        _ => false,
    }
}

/// Pull a human-readable message out of an error body
fn extract_message(body: &Value) -> Option<String> {
    match body {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Object(map) => {
            if let Some(error) = map.get("error") {
                if let Some(message) = error.get("message").and_then(Value::as_str) {
                    return Some(message.to_string());
                }
                if let Some(code) = error.get("code").and_then(Value::as_str) {
                    return Some(code.to_string());
                }
                if let Some(text) = error.as_str() {
                    return Some(text.to_string());
                }
            }
            map.get("message")
                .and_then(Value::as_str)
                .map(ToString::to_string)
        }
        _ => None,
    }
}

fn retry_after_header(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .map(Duration::from_secs)
}

fn retry_hint(message: &str) -> Option<Duration> {
    RETRY_HINT
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .map(Duration::from_secs)
}
