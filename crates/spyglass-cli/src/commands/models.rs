//! `spyglass models` subcommands.

use clap::{Args, Subcommand};
use spyglass_sdk::SpyglassClient;
use spyglass_sdk::resources::ListModelsVariables;

use crate::output;

#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    command: ModelsCommand,
}

#[derive(Subcommand)]
enum ModelsCommand {
    /// List models across all pages.
    List {
        /// Filter by name substring.
        #[arg(long)]
        search: Option<String>,
        /// Page size requested from the API.
        #[arg(long)]
        first: Option<u32>,
    },
    /// Fetch one model by id.
    Get {
        /// Model id.
        id: String,
    },
}

pub async fn run(client: &SpyglassClient, args: ModelsArgs, json: bool) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::List { search, first } => {
            let models = client
                .models()
                .list(ListModelsVariables {
                    search,
                    first,
                    cursor: None,
                })
                .await?;
            output::print_records(&models, json)
        }
        ModelsCommand::Get { id } => {
            let model = client.models().get(id).await?;
            output::print_records(&[model], json)
        }
    }
}
