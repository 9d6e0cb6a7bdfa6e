//! `spyglass prompts` subcommands.

use clap::{Args, Subcommand};
use spyglass_sdk::SpyglassClient;
use spyglass_sdk::resources::ListPromptsVariables;

use crate::output;

#[derive(Args)]
pub struct PromptsArgs {
    #[command(subcommand)]
    command: PromptsCommand,
}

#[derive(Subcommand)]
enum PromptsCommand {
    /// List prompt templates across all pages.
    List {
        /// Filter by name substring.
        #[arg(long)]
        search: Option<String>,
        /// Page size requested from the API.
        #[arg(long)]
        first: Option<u32>,
    },
}

pub async fn run(client: &SpyglassClient, args: PromptsArgs, json: bool) -> anyhow::Result<()> {
    match args.command {
        PromptsCommand::List { search, first } => {
            let prompts = client
                .prompts()
                .list(ListPromptsVariables {
                    search,
                    first,
                    cursor: None,
                })
                .await?;
            output::print_records(&prompts, json)
        }
    }
}
