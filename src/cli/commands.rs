//! CLI commands and argument parsing

use crate::admin::{
    ListGroupsOptions, RefreshablesOptions, ReportsOptions, ScanOptions, DEFAULT_PAGE_SIZE,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Power BI admin API client
#[derive(Parser, Debug)]
#[command(name = "pbi-admin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML). Credentials fall back to PBI_CLIENT_ID,
    /// PBI_CLIENT_SECRET and PBI_TENANT_ID.
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether a token can be acquired
    Token,

    /// List all workspaces
    Groups {
        /// Page size per request (max 5000)
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        top: u32,

        /// Related entities to expand (e.g. users,reports)
        #[arg(long)]
        expand: Option<String>,

        /// OData filter
        #[arg(long)]
        filter: Option<String>,

        /// Items to skip
        #[arg(long)]
        skip: Option<u32>,
    },

    /// List refreshables of a workspace
    Refreshables {
        /// Workspace id
        #[arg(long)]
        group: String,

        /// Page size per request (max 5000)
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        top: u32,

        /// Related entities to expand
        #[arg(long, default_value = "group")]
        expand: String,

        /// Do not send $expand
        #[arg(long)]
        no_expand: bool,

        /// Items to skip
        #[arg(long)]
        skip: Option<u32>,
    },

    /// List reports of a workspace
    Reports {
        /// Workspace id
        #[arg(long)]
        group_id: String,

        /// Page size per request (max 5000)
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        top: u32,

        /// OData filter
        #[arg(long)]
        filter: Option<String>,

        /// Items to skip
        #[arg(long)]
        skip: Option<u32>,
    },

    /// Start a metadata scan of workspaces
    ScanStart {
        /// Workspace ids (the API accepts up to 100)
        #[arg(required = true)]
        workspaces: Vec<String>,

        /// Omit DAX and mashup expressions
        #[arg(long)]
        no_dataset_expressions: bool,

        /// Omit tables, columns and measures
        #[arg(long)]
        no_dataset_schema: bool,

        /// Omit datasource details
        #[arg(long)]
        no_datasource_details: bool,

        /// Include artifact users
        #[arg(long)]
        artifact_users: bool,

        /// Omit lineage
        #[arg(long)]
        no_lineage: bool,
    },

    /// Show the status of a scan
    ScanStatus {
        /// Scan id returned by scan-start
        scan_id: String,
    },

    /// Fetch the result of a finished scan
    ScanResult {
        /// Scan id returned by scan-start
        scan_id: String,
    },
}

impl Commands {
    /// Options for the `groups` command
    pub fn groups_options(&self) -> Option<ListGroupsOptions> {
        match self {
            Self::Groups {
                top,
                expand,
                filter,
                skip,
            } => Some(ListGroupsOptions {
                top: Some(*top),
                expand: expand.clone(),
                filter: filter.clone(),
                skip: *skip,
            }),
            _ => None,
        }
    }

    /// Options for the `refreshables` command
    pub fn refreshables_options(&self) -> Option<RefreshablesOptions> {
        match self {
            Self::Refreshables {
                group,
                top,
                expand,
                no_expand,
                skip,
            } => Some(RefreshablesOptions {
                group: Some(group.clone()),
                top: Some(*top),
                expand: (!no_expand).then(|| expand.clone()),
                skip: *skip,
            }),
            _ => None,
        }
    }

    /// Options for the `reports` command
    pub fn reports_options(&self) -> Option<ReportsOptions> {
        match self {
            Self::Reports {
                group_id,
                top,
                filter,
                skip,
            } => Some(ReportsOptions {
                group_id: Some(group_id.clone()),
                top: Some(*top),
                filter: filter.clone(),
                skip: *skip,
            }),
            _ => None,
        }
    }

    /// Options for the `scan-start` command
    pub fn scan_options(&self) -> Option<ScanOptions> {
        match self {
            Self::ScanStart {
                no_dataset_expressions,
                no_dataset_schema,
                no_datasource_details,
                artifact_users,
                no_lineage,
                ..
            } => Some(ScanOptions {
                dataset_expressions: !no_dataset_expressions,
                dataset_schema: !no_dataset_schema,
                datasource_details: !no_datasource_details,
                get_artifact_users: *artifact_users,
                lineage: !no_lineage,
            }),
            _ => None,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}
