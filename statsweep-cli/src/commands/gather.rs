//! Gather command - run one collection cycle.

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{cancel_on_ctrl_c, load_config};
use crate::output::{JsonFormatter, RecordWriter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for gather command.
#[derive(Args, Default)]
pub struct GatherArgs {
    /// Override the number of concurrent detail requests.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Override the page limit.
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Print the cycle summary after the records.
    #[arg(long, short)]
    pub summary: bool,
}

/// Runs the gather command.
pub async fn run(args: &GatherArgs, cli: &Cli) -> Result<()> {
    let mut config = load_config(cli)?;
    if let Some(concurrency) = args.concurrency {
        config.detail_concurrency = concurrency;
    }
    if let Some(max_pages) = args.max_pages {
        config.max_pages = max_pages;
    }

    let collector = config.build_collector()?;
    let ctx = config.fetch_context(cancel_on_ctrl_c())?;
    let writer = RecordWriter::new(cli);

    info!(name = %config.name, "Starting gather");
    let report = collector.gather(&ctx, &writer).await?;

    if args.summary || !report.is_clean() {
        match cli.format {
            OutputFormat::Text => {
                if !cli.quiet {
                    eprintln!("{}", TextFormatter::for_stderr(cli.no_color).format_report(&report));
                }
            }
            OutputFormat::Json => {
                eprintln!("{}", JsonFormatter::new(cli.pretty).format_report(&report)?);
            }
        }
    }

    Ok(())
}
