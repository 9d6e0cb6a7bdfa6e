//! `spyglass spans` subcommands.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use spyglass_sdk::SpyglassClient;
use spyglass_sdk::resources::ListSpansVariables;
use tracing::info;

use crate::output;

#[derive(Args)]
pub struct SpansArgs {
    #[command(subcommand)]
    command: SpansCommand,
}

#[derive(Args)]
struct SpanFilter {
    /// Restrict to spans of one trace.
    #[arg(long)]
    trace_id: Option<String>,
    /// Inclusive start of the time window, RFC 3339.
    #[arg(long)]
    start: Option<String>,
    /// Exclusive end of the time window, RFC 3339.
    #[arg(long)]
    end: Option<String>,
    /// Page size requested from the API.
    #[arg(long)]
    first: Option<u32>,
}

impl SpanFilter {
    fn into_variables(self) -> ListSpansVariables {
        ListSpansVariables {
            trace_id: self.trace_id,
            start: self.start,
            end: self.end,
            first: self.first,
            cursor: None,
        }
    }
}

#[derive(Subcommand)]
enum SpansCommand {
    /// List spans across all pages.
    List {
        #[command(flatten)]
        filter: SpanFilter,
    },
    /// Export spans as CSV, one column per flattened attribute path.
    Export {
        #[command(flatten)]
        filter: SpanFilter,
        /// Output file, or `-` for stdout.
        #[arg(long, default_value = "-")]
        out: PathBuf,
    },
}

pub async fn run(client: &SpyglassClient, args: SpansArgs, json: bool) -> anyhow::Result<()> {
    match args.command {
        SpansCommand::List { filter } => {
            let spans = client.spans().list(filter.into_variables()).await?;
            output::print_records(&spans, json)
        }
        SpansCommand::Export { filter, out } => {
            let spans = client.spans().list(filter.into_variables()).await?;
            let count = spans.len();
            if out.to_str() == Some("-") {
                output::write_csv(&spans, std::io::stdout().lock())?;
            } else {
                let file = File::create(&out)
                    .with_context(|| format!("creating {}", out.display()))?;
                let mut file = std::io::BufWriter::new(file);
                output::write_csv(&spans, &mut file)?;
                file.flush()?;
                info!(count, path = %out.display(), "exported spans");
            }
            Ok(())
        }
    }
}
