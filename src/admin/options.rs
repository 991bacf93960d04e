//! Recognized options for each admin operation
//!
//! Each field maps to exactly one query parameter. A field left as `None`
//! is not sent at all; there are no empty placeholders.

use crate::pagination::PageRequest;
use crate::types::MAX_PAGE_SIZE;

/// OData expand query parameter
pub const EXPAND_PARAM: &str = "$expand";

/// OData filter query parameter
pub const FILTER_PARAM: &str = "$filter";

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: u32 = MAX_PAGE_SIZE;

fn push_opt(pairs: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        pairs.push((key.to_string(), value.to_string()));
    }
}

// ============================================================================
// Groups
// ============================================================================

/// Options for `GET admin/groups`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListGroupsOptions {
    /// `$top`: page size per call, capped at 5000
    pub top: Option<u32>,
    /// `$expand`: related entities to inline, e.g. `users,reports`
    pub expand: Option<String>,
    /// `$filter`: OData filter over groups
    pub filter: Option<String>,
    /// `$skip`: items to skip before the first page
    pub skip: Option<u32>,
}

impl Default for ListGroupsOptions {
    fn default() -> Self {
        Self {
            top: Some(DEFAULT_PAGE_SIZE),
            expand: None,
            filter: None,
            skip: None,
        }
    }
}

impl ListGroupsOptions {
    /// Create options with the default page size
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    #[must_use]
    pub fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Set `$expand`
    #[must_use]
    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }

    /// Set `$filter`
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the starting offset
    #[must_use]
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub(crate) fn page(&self) -> PageRequest {
        PageRequest::new(self.top, self.skip)
    }

    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, EXPAND_PARAM, self.expand.as_deref());
        push_opt(&mut pairs, FILTER_PARAM, self.filter.as_deref());
        pairs
    }
}

// ============================================================================
// Refreshables
// ============================================================================

/// Options for `GET admin/capacities/refreshables`, scoped to one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshablesOptions {
    /// Workspace id; becomes `$filter=group/id eq '<group>'`. Without it no request is made.
    pub group: Option<String>,
    /// `$top`: page size per call, capped at 5000
    pub top: Option<u32>,
    /// `$expand`: defaults to `group`
    pub expand: Option<String>,
    /// `$skip`: items to skip before the first page
    pub skip: Option<u32>,
}

impl Default for RefreshablesOptions {
    fn default() -> Self {
        Self {
            group: None,
            top: Some(DEFAULT_PAGE_SIZE),
            expand: Some("group".to_string()),
            skip: None,
        }
    }
}

impl RefreshablesOptions {
    /// Create options for a group
    pub fn for_group(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            ..Self::default()
        }
    }

    /// Set the page size
    #[must_use]
    pub fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Set or clear `$expand`
    #[must_use]
    pub fn expand(mut self, expand: Option<String>) -> Self {
        self.expand = expand;
        self
    }

    /// Set the starting offset
    #[must_use]
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub(crate) fn page(&self) -> PageRequest {
        PageRequest::new(self.top, self.skip)
    }

    pub(crate) fn query_pairs(&self, group: &str) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, EXPAND_PARAM, self.expand.as_deref());
        pairs.push((FILTER_PARAM.to_string(), format!("group/id eq '{group}'")));
        pairs
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Options for `GET admin/groups/{groupId}/reports`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportsOptions {
    /// Workspace id in the URL path. Without it no request is made.
    pub group_id: Option<String>,
    /// `$top`: page size per call, capped at 5000
    pub top: Option<u32>,
    /// `$filter`: OData filter over reports
    pub filter: Option<String>,
    /// `$skip`: items to skip before the first page
    pub skip: Option<u32>,
}

impl Default for ReportsOptions {
    fn default() -> Self {
        Self {
            group_id: None,
            top: Some(DEFAULT_PAGE_SIZE),
            filter: None,
            skip: None,
        }
    }
}

impl ReportsOptions {
    /// Create options for a group
    pub fn for_group(group_id: impl Into<String>) -> Self {
        Self {
            group_id: Some(group_id.into()),
            ..Self::default()
        }
    }

    /// Set the page size
    #[must_use]
    pub fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Set `$filter`
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the starting offset
    #[must_use]
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub(crate) fn page(&self) -> PageRequest {
        PageRequest::new(self.top, self.skip)
    }

    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, FILTER_PARAM, self.filter.as_deref());
        pairs
    }
}

// ============================================================================
// Workspace scan
// ============================================================================

/// Options for `POST admin/workspaces/getInfo`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// `datasetExpressions`: include DAX and mashup queries
    pub dataset_expressions: bool,
    /// `datasetSchema`: include tables, columns and measures
    pub dataset_schema: bool,
    /// `datasourceDetails`: include datasource details
    pub datasource_details: bool,
    /// `getArtifactUsers`: include artifact users and their permission level
    pub get_artifact_users: bool,
    /// `lineage`: include upstream dataflows, tiles and datasource ids
    pub lineage: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            dataset_expressions: true,
            dataset_schema: true,
            datasource_details: true,
            get_artifact_users: false,
            lineage: true,
        }
    }
}

impl ScanOptions {
    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        [
            ("datasetExpressions", self.dataset_expressions),
            ("datasetSchema", self.dataset_schema),
            ("datasourceDetails", self.datasource_details),
            ("getArtifactUsers", self.get_artifact_users),
            ("lineage", self.lineage),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
    }
}
