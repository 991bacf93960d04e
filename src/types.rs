//! Common types used throughout pbi-admin
//!
//! Remote API limits and the typed warning annotation returned alongside
//! results when a documented limit is crossed.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

// ============================================================================
// Remote API Limits
// ============================================================================

/// Maximum `$top` the admin API honours in one call
pub const MAX_PAGE_SIZE: u32 = 5000;

/// Maximum workspace ids accepted by one `getInfo` scan request
pub const MAX_SCAN_WORKSPACES: usize = 100;

// ============================================================================
// Limit Warnings
// ============================================================================

/// A non-fatal diagnostic raised when a request crosses a documented limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LimitWarning {
    /// Requested page size exceeded the API maximum and was lowered
    PageSizeClamped {
        /// Page size the caller asked for
        requested: u32,
        /// Page size actually sent
        applied: u32,
    },

    /// More workspaces than one scan request accepts. The list is still sent.
    TooManyWorkspaces {
        /// Number of workspace ids supplied
        requested: usize,
        /// Documented per-request limit
        limit: usize,
    },

    /// A continuation page came back empty before the reported total was met
    StalledPagination {
        /// Items accumulated when the loop stopped
        fetched: usize,
        /// Total the server reported
        reported_total: usize,
    },
}

impl LimitWarning {
    /// Emit this warning as a tracing event
    pub fn emit(&self) {
        match self {
            Self::PageSizeClamped { requested, applied } => {
                warn!(requested, applied, "page size exceeds API maximum, clamping");
            }
            Self::TooManyWorkspaces { requested, limit } => {
                warn!(
                    requested,
                    limit, "scan request exceeds workspace limit, sending unchanged"
                );
            }
            Self::StalledPagination {
                fetched,
                reported_total,
            } => {
                warn!(
                    fetched,
                    reported_total, "empty page before reported total, stopping"
                );
            }
        }
    }
}

impl fmt::Display for LimitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageSizeClamped { requested, applied } => write!(
                f,
                "The maximum registries one API call can retrieve is {applied} (requested {requested})"
            ),
            Self::TooManyWorkspaces { requested, limit } => write!(
                f,
                "This API can only retrieve {limit} workspaces each request (got {requested})"
            ),
            Self::StalledPagination {
                fetched,
                reported_total,
            } => write!(
                f,
                "Pagination stalled at {fetched} of {reported_total} reported items"
            ),
        }
    }
}

/// A value together with the limit warnings raised while producing it
#[derive(Debug, Clone, PartialEq)]
pub struct Annotated<T> {
    /// The result
    pub value: T,
    /// Warnings raised along the way, in order
    pub warnings: Vec<LimitWarning>,
}

impl<T> Annotated<T> {
    /// Wrap a value with no warnings
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Wrap a value with the given warnings
    pub fn new(value: T, warnings: Vec<LimitWarning>) -> Self {
        Self { value, warnings }
    }

    /// Check whether any warning was raised
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Drop the warnings and return the value
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Transform the value, keeping the warnings
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Annotated<U> {
        Annotated {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
