//! Pagination types
//!
//! Page parameters sent with each call and the aggregated result.

use crate::http::ApiResponse;
use serde_json::Value;

/// OData page size query parameter
pub const TOP_PARAM: &str = "$top";

/// OData offset query parameter
pub const SKIP_PARAM: &str = "$skip";

/// Page parameters for one listing call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    /// Page size (`$top`); omitted when `None`
    pub top: Option<u32>,
    /// Offset (`$skip`); omitted when `None`
    pub skip: Option<u32>,
}

impl PageRequest {
    /// Create page parameters
    pub fn new(top: Option<u32>, skip: Option<u32>) -> Self {
        Self { top, skip }
    }

    /// Same page size, new offset
    #[must_use]
    pub fn with_skip(self, skip: u32) -> Self {
        Self {
            skip: Some(skip),
            ..self
        }
    }

    /// Query pairs for the set parameters
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(top) = self.top {
            pairs.push((TOP_PARAM.to_string(), top.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push((SKIP_PARAM.to_string(), skip.to_string()));
        }
        pairs
    }
}

/// Result of aggregating a listing
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    /// Every item across all pages, in page order
    Items(Vec<Value>),
    /// The first call did not return a listing page; passed through as-is
    Response(ApiResponse),
}

impl Listing {
    /// An empty listing
    pub fn empty() -> Self {
        Self::Items(Vec::new())
    }

    /// The accumulated items, if the listing completed
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Self::Items(items) => Some(items),
            Self::Response(_) => None,
        }
    }

    /// Take the items, or get back the passed-through response
    pub fn into_items(self) -> std::result::Result<Vec<Value>, ApiResponse> {
        match self {
            Self::Items(items) => Ok(items),
            Self::Response(response) => Err(response),
        }
    }
}
