//! HTTP client module
//!
//! Provides the credentialed request/response cycle against the admin API.
//!
//! # Features
//!
//! - **Authorization**: Bearer header from the auth module on every request
//! - **Pluggable transport**: reqwest by default, anything implementing [`Transport`] in tests
//! - **Tagged responses**: success, error and rate-limited outcomes as [`ApiResponse`] variants

mod client;
mod envelope;
#[cfg(test)]
pub(crate) mod recording;

pub use client::{ApiClient, RawResponse, RequestDescriptor, ReqwestTransport, Transport};
pub use envelope::{ApiResponse, Envelope, COUNT_FIELD, ITEMS_FIELD};
