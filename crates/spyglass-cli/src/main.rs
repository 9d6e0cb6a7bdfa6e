//! Spyglass operator CLI entrypoint.
//!
//! - `spyglass models` - inspect the model catalog
//! - `spyglass monitors` - list and create monitors
//! - `spyglass prompts` - inspect prompt templates
//! - `spyglass spans` - query and export traced spans

#![forbid(unsafe_code)]

mod commands;
mod output;

use clap::{Parser, Subcommand};
use spyglass_sdk::{SdkConfig, SpyglassClient};

/// Client CLI for the Spyglass observability platform.
#[derive(Parser)]
#[command(name = "spyglass")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Emit JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    /// GraphQL endpoint override.
    #[arg(long, env = "SPYGLASS_ENDPOINT")]
    endpoint: Option<String>,

    /// API key override.
    #[arg(long, env = "SPYGLASS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect models tracked by the platform.
    Models(commands::models::ModelsArgs),

    /// List and create drift/performance monitors.
    Monitors(commands::monitors::MonitorsArgs),

    /// Inspect prompt templates.
    Prompts(commands::prompts::PromptsArgs),

    /// Query and export traced spans.
    Spans(commands::spans::SpansArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for tables, JSON, and CSV.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = SdkConfig::from_env()?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(api_key) = cli.api_key {
        config.api_key = Some(api_key);
    }
    let client = SpyglassClient::new(config)?;

    match cli.command {
        Commands::Models(args) => commands::models::run(&client, args, cli.json).await,
        Commands::Monitors(args) => commands::monitors::run(&client, args, cli.json).await,
        Commands::Prompts(args) => commands::prompts::run(&client, args, cli.json).await,
        Commands::Spans(args) => commands::spans::run(&client, args, cli.json).await,
    }
}
