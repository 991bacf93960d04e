//! Pagination module
//!
//! # Overview
//!
//! Admin listing endpoints return at most `$top` items per call together with
//! an `@odata.count` total. The [`PageAggregator`] wraps any single-page
//! fetcher and keeps calling it with `$skip` set to the number of items
//! already collected, so callers see the complete result set.

mod aggregator;
mod types;

pub use aggregator::PageAggregator;
pub use types::{Listing, PageRequest, SKIP_PARAM, TOP_PARAM};
