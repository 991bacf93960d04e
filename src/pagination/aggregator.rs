//! Page aggregation
//!
//! Drives a single-page fetcher until the server-reported `@odata.count` is
//! reached, feeding the accumulated length back as `$skip`.

use super::types::{Listing, PageRequest};
use crate::error::{Error, Result};
use crate::http::ApiResponse;
use crate::types::{Annotated, LimitWarning, MAX_PAGE_SIZE};
use serde_json::Value;
use std::future::Future;
use tracing::debug;

/// Turns a page fetcher into a complete listing
#[derive(Debug, Clone, Copy)]
pub struct PageAggregator {
    max_page_size: u32,
}

impl Default for PageAggregator {
    fn default() -> Self {
        Self::new(MAX_PAGE_SIZE)
    }
}

impl PageAggregator {
    /// Create an aggregator with the given page size cap
    pub fn new(max_page_size: u32) -> Self {
        Self { max_page_size }
    }

    /// Lower `top` to the cap, recording a warning when it was above it
    pub fn clamp(&self, request: PageRequest, warnings: &mut Vec<LimitWarning>) -> PageRequest {
        match request.top {
            Some(top) if top > self.max_page_size => {
                let warning = LimitWarning::PageSizeClamped {
                    requested: top,
                    applied: self.max_page_size,
                };
                warning.emit();
                warnings.push(warning);
                PageRequest {
                    top: Some(self.max_page_size),
                    ..request
                }
            }
            _ => request,
        }
    }

    /// Fetch every page.
    ///
    /// The first response is returned unchanged as [`Listing::Response`]
    /// unless it is a success carrying both `value` and `@odata.count`.
    /// Once paging has started, a page that is not a listing page aborts
    /// with [`Error::Pagination`].
    ///
    /// A starting `skip` applies to the first call only. Continuation calls
    /// send `$skip` equal to the number of items collected so far, so a
    /// non-zero starting offset can re-fetch items already returned.
    pub async fn collect<F, Fut>(&self, request: PageRequest, mut fetch: F) -> Result<Annotated<Listing>>
    where
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<ApiResponse>>,
    {
        let mut warnings = Vec::new();
        let mut request = self.clamp(request, &mut warnings);

        let (mut items, mut total) = match split_page(fetch(request).await?) {
            Ok(page) => page,
            Err(response) => return Ok(Annotated::new(Listing::Response(response), warnings)),
        };

        while items.len() < total {
            request = request.with_skip(items.len() as u32);
            debug!(skip = items.len(), total, "fetching next page");

            let (page, page_total) = split_page(fetch(request).await?)
                .map_err(|response| Error::pagination(items.len(), response))?;

            if page.is_empty() {
                let warning = LimitWarning::StalledPagination {
                    fetched: items.len(),
                    reported_total: page_total,
                };
                warning.emit();
                warnings.push(warning);
                break;
            }

            items.extend(page);
            total = page_total;
        }

        debug!(fetched = items.len(), "listing complete");
        Ok(Annotated::new(Listing::Items(items), warnings))
    }
}

/// Split a listing page into items and reported total, or hand the response back
fn split_page(response: ApiResponse) -> std::result::Result<(Vec<Value>, usize), ApiResponse> {
    match response {
        ApiResponse::Success(envelope) => match envelope.total_count() {
            Some(total) if envelope.items().is_some() => Ok((envelope.into_items(), total)),
            _ => Err(ApiResponse::Success(envelope)),
        },
        other => Err(other),
    }
}
