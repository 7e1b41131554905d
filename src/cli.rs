//! CLI interface for harness-lens: command parsing, argument surface and the
//! async entrypoint used by both `main()` and the integration tests.
//!
//! All business logic (API contract, diffing, aggregation, rendering) lives
//! in the `harness-lens-core` crate. This module is strictly CLI glue:
//! settings bootstrap, client construction and subcommand routing.
//!
//! Each subcommand mirrors one of the original one-shot diagnostics and
//! takes no further arguments; reports go to stdout.

use anyhow::Result;
use clap::{Parser, Subcommand};

use harness_lens_core::census::run_census;
use harness_lens_core::client::RestClient;
use harness_lens_core::contract::{ConfigVariant, HarnessApi};
use harness_lens_core::diff::{diff_configs, has_overrides};
use harness_lens_core::report::{
    render_census, render_config_diff, render_no_overrides, render_tag_report,
};
use harness_lens_core::settings::Settings;
use harness_lens_core::tags::run_scan;

/// CLI for harness-lens: audit Harness NextGen configuration and pipelines.
#[derive(Parser)]
#[clap(
    name = "harness-lens",
    version,
    about = "Audit and report on Harness NextGen configuration and pipelines"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare the default execution config against the customer overrides
    ConfigDiff,
    /// Fetch the customer override document and pretty-print it as JSON
    ConfigDump,
    /// Count pipelines per organization across the account
    Census,
    /// Count pipelines per appID tag found in pipeline YAML
    AppIds,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    let settings =
        Settings::from_env().map_err(|e| anyhow::Error::msg(format!("Configuration error: {e}")))?;
    settings.trace_loaded();
    let client = RestClient::new(settings)
        .map_err(|e| anyhow::Error::msg(format!("Failed to construct Harness client: {e}")))?;

    match cli.command {
        Commands::ConfigDiff => {
            tracing::info!(command = "config-diff", "Fetching execution configurations");
            let default_doc = client
                .execution_config(ConfigVariant::Default)
                .await
                .map_err(|e| anyhow::Error::msg(format!("Failed to fetch default config: {e}")))?;
            let customer_doc = client
                .execution_config(ConfigVariant::Customer)
                .await
                .map_err(|e| anyhow::Error::msg(format!("Failed to fetch customer config: {e}")))?;

            if !has_overrides(&customer_doc) {
                tracing::info!(command = "config-diff", "Customer config has no overrides");
                println!("{}", render_no_overrides(&default_doc));
            } else {
                let diff = diff_configs(&default_doc, &customer_doc);
                tracing::info!(
                    command = "config-diff",
                    overridden = diff.overridden.len(),
                    customer_only = diff.customer_only.len(),
                    default_only = diff.default_only.len(),
                    unchanged = diff.unchanged.len(),
                    "Computed configuration diff"
                );
                println!("{}", render_config_diff(&diff));
            }
        }
        Commands::ConfigDump => {
            tracing::info!(command = "config-dump", "Fetching customer config");
            let doc = client
                .execution_config(ConfigVariant::Customer)
                .await
                .map_err(|e| anyhow::Error::msg(format!("Failed to fetch customer config: {e}")))?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Commands::Census => {
            tracing::info!(command = "census", "Starting pipeline census");
            let report = run_census(&client)
                .await
                .map_err(|e| anyhow::Error::msg(format!("Census failed: {e}")))?;
            println!("{}", render_census(&report));
        }
        Commands::AppIds => {
            tracing::info!(command = "app-ids", "Starting appID scan");
            let report = run_scan(&client)
                .await
                .map_err(|e| anyhow::Error::msg(format!("AppID scan failed: {e}")))?;
            println!("{}", render_tag_report(&report));
        }
    }

    Ok(())
}
