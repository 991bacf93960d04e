//! Error types for pbi-admin
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Remote API failures are NOT errors: they come back as
//! [`ApiResponse::Error`](crate::http::ApiResponse) values. This enum covers
//! local failures (config, transport, decoding) and pagination breaks.

use crate::http::ApiResponse;
use thiserror::Error;

/// The main error type for pbi-admin
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to decode response (HTTP {status}): {message}")]
    Decode { status: u16, message: String },

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Pagination stopped after {fetched} items: {}", response.summary())]
    Pagination {
        fetched: usize,
        response: Box<ApiResponse>,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(status: u16, message: impl Into<String>) -> Self {
        Self::Decode {
            status,
            message: message.into(),
        }
    }

    /// Create a pagination error carrying the page that broke the loop
    pub fn pagination(fetched: usize, response: ApiResponse) -> Self {
        Self::Pagination {
            fetched,
            response: Box::new(response),
        }
    }
}

/// Result type alias for pbi-admin
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
