//! CLI module
//!
//! Command-line interface over the admin client.
//!
//! # Commands
//!
//! - `token` - Check that the service principal can authenticate
//! - `groups` - List all workspaces
//! - `refreshables` - List refreshables of a workspace
//! - `reports` - List reports of a workspace
//! - `scan-start` / `scan-status` / `scan-result` - Workspace metadata scans

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{CommandOutput, Runner};
