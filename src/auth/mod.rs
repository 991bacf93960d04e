//! Authentication module
//!
//! Confidential-client (service principal) authentication: one client
//! credentials exchange at construction, then a static bearer header.
//!
//! The `Authenticator` never fails construction. When the identity provider
//! issues no token the state is recorded as [`TokenState::Missing`] and
//! requests go out without an `Authorization` header.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, ClientCredentialsProvider, TokenProvider};
pub use types::{AccessToken, Credential, TokenState, DEFAULT_SCOPE};

#[cfg(test)]
mod tests;
