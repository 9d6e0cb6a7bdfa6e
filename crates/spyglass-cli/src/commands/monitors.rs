//! `spyglass monitors` subcommands.

use clap::{Args, Subcommand};
use spyglass_sdk::SpyglassClient;
use spyglass_sdk::resources::{CreateMonitorVariables, ListMonitorsVariables};

use crate::output;

#[derive(Args)]
pub struct MonitorsArgs {
    #[command(subcommand)]
    command: MonitorsCommand,
}

#[derive(Subcommand)]
enum MonitorsCommand {
    /// List monitors across all pages.
    List {
        /// Restrict to monitors on one model.
        #[arg(long)]
        model_id: Option<String>,
        /// Page size requested from the API.
        #[arg(long)]
        first: Option<u32>,
    },
    /// Create a monitor on a metric.
    Create {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Metric to watch (psi, accuracy, latency, ...).
        #[arg(long)]
        metric: String,
        /// Alert threshold.
        #[arg(long)]
        threshold: f64,
        /// Start enabled or disabled; omit to use the server default.
        #[arg(long)]
        enabled: Option<bool>,
    },
}

pub async fn run(client: &SpyglassClient, args: MonitorsArgs, json: bool) -> anyhow::Result<()> {
    match args.command {
        MonitorsCommand::List { model_id, first } => {
            let monitors = client
                .monitors()
                .list(ListMonitorsVariables {
                    model_id,
                    first,
                    cursor: None,
                })
                .await?;
            output::print_records(&monitors, json)
        }
        MonitorsCommand::Create {
            name,
            metric,
            threshold,
            enabled,
        } => {
            let monitor = client
                .monitors()
                .create(CreateMonitorVariables {
                    name,
                    metric,
                    threshold,
                    enabled,
                    cursor: None,
                })
                .await?;
            output::print_records(&[monitor], json)
        }
    }
}
