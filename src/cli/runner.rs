//! CLI runner - executes commands

use crate::admin::AdminClient;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::ApiResponse;
use crate::pagination::Listing;
use crate::types::Annotated;
use serde_json::{json, Value};
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, printing the result to stdout
    pub async fn run(&self) -> Result<()> {
        let output = self.execute().await?;
        println!("{}", self.render(&output.value)?);
        match output.failure {
            Some(summary) => Err(Error::Other(format!("Request failed: {summary}"))),
            None => Ok(()),
        }
    }

    /// Run the CLI command and return what would be printed
    pub async fn execute(&self) -> Result<CommandOutput> {
        let config = self.load_config()?;
        let credential = config.resolve_credential()?;
        debug!(client_id = credential.client_id(), "connecting");
        let client = AdminClient::connect_with(&config, credential).await?;

        let command = &self.cli.command;
        match command {
            Commands::Token => Ok(token_report(&client)),
            Commands::Groups { .. } => {
                let options = command.groups_options().unwrap_or_default();
                Ok(listing_output(client.list_groups_as_admin(&options).await?))
            }
            Commands::Refreshables { .. } => {
                let options = command.refreshables_options().unwrap_or_default();
                Ok(listing_output(
                    client.list_refreshables_for_group_as_admin(&options).await?,
                ))
            }
            Commands::Reports { .. } => {
                let options = command.reports_options().unwrap_or_default();
                Ok(listing_output(
                    client.list_reports_for_group_as_admin(&options).await?,
                ))
            }
            Commands::ScanStart { workspaces, .. } => {
                let options = command.scan_options().unwrap_or_default();
                let response = client.start_workspace_scan(workspaces, &options).await?;
                Ok(response_output(response.value))
            }
            Commands::ScanStatus { scan_id } => {
                Ok(response_output(client.get_scan_status(scan_id).await?))
            }
            Commands::ScanResult { scan_id } => {
                Ok(response_output(client.get_scan_result(scan_id).await?))
            }
        }
    }

    /// Load config from the `-C` file, or defaults
    fn load_config(&self) -> Result<ClientConfig> {
        match &self.cli.config {
            Some(path) => ClientConfig::from_file(path),
            None => Ok(ClientConfig::default()),
        }
    }

    fn render(&self, value: &Value) -> Result<String> {
        Ok(match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        })
    }
}

/// What a command produced
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    /// JSON printed to stdout
    pub value: Value,
    /// Summary of the non-success response, if the API refused the call
    pub failure: Option<String>,
}

fn token_report(client: &AdminClient) -> CommandOutput {
    let value = match client.require_token() {
        Ok(token) => json!({
            "acquired": true,
            "expires_at": token.expires_at,
        }),
        Err(e) => json!({
            "acquired": false,
            "reason": e.to_string(),
        }),
    };
    let failure = value["reason"].as_str().map(ToString::to_string);
    CommandOutput { value, failure }
}

fn listing_output(listing: Annotated<Listing>) -> CommandOutput {
    match listing.into_inner() {
        Listing::Items(items) => CommandOutput {
            value: Value::Array(items),
            failure: None,
        },
        Listing::Response(response) => response_output(response),
    }
}

fn response_output(response: ApiResponse) -> CommandOutput {
    let failure = (!response.is_success()).then(|| response.summary());
    CommandOutput {
        value: response.into_body(),
        failure,
    }
}
