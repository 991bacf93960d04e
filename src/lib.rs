// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pbi-admin
//!
//! Credentialed client for the Power BI admin REST API.
//!
//! ## Features
//!
//! - **Service principal auth**: OAuth2 client credentials, one exchange per client
//! - **Transparent pagination**: listing calls return every item, not one page
//! - **Tagged responses**: success, error and rate-limited outcomes are distinct variants
//! - **Typed warnings**: page-size and workspace-count limits come back as data
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pbi_admin::{AdminClient, Credential, ListGroupsOptions, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let credential = Credential::new("client-id", "client-secret", "tenant-id");
//!     let client = AdminClient::connect(credential).await?;
//!
//!     let groups = client.list_groups_as_admin(&ListGroupsOptions::new()).await?;
//!     for warning in &groups.warnings {
//!         eprintln!("{warning}");
//!     }
//!     if let Some(items) = groups.value.items() {
//!         println!("{} workspaces", items.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        AdminClient                          │
//! │  groups · refreshables · reports · scan start/status/result │
//! └─────────────────────────────────────────────────────────────┘
//!                │                               │
//! ┌──────────────┴──────────────┐ ┌──────────────┴──────────────┐
//! │       PageAggregator        │ │          ApiClient          │
//! │ clamp $top · loop on $skip  │ │ bearer header · classify    │
//! └─────────────────────────────┘ └──────────────┬──────────────┘
//!                                 ┌──────────────┴──────────────┐
//!                                 │ Authenticator │  Transport  │
//!                                 └─────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and API limits
pub mod types;

/// Service principal authentication
pub mod auth;

/// Credentialed HTTP client
pub mod http;

/// Page aggregation
pub mod pagination;

/// Admin API operations
pub mod admin;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use admin::{AdminClient, ListGroupsOptions, RefreshablesOptions, ReportsOptions, ScanOptions};
pub use auth::{Credential, TokenState};
pub use config::ClientConfig;
pub use http::ApiResponse;
pub use pagination::Listing;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
