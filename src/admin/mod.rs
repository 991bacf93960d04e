//! Admin API module
//!
//! Typed wrappers over the Power BI admin endpoints:
//!
//! - `admin/groups` (paginated)
//! - `admin/capacities/refreshables` (paginated, per group)
//! - `admin/groups/{groupId}/reports` (paginated)
//! - `admin/workspaces/getInfo`, `scanStatus/{id}`, `scanResult/{id}`

mod client;
mod options;

pub use client::AdminClient;
pub use options::{
    ListGroupsOptions, RefreshablesOptions, ReportsOptions, ScanOptions, DEFAULT_PAGE_SIZE,
    EXPAND_PARAM, FILTER_PARAM,
};
