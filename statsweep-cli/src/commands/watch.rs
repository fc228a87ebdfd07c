//! Watch command - gather on a schedule until interrupted.

use anyhow::Result;
use clap::Args;
use statsweep_core::MetricSink;
use statsweep_fetch::FetchError;
use statsweep_store::MetricStore;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

use super::{cancel_on_ctrl_c, load_config};
use crate::output::{JsonFormatter, RecordWriter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between cycles. Defaults to the config's `interval_secs`.
    #[arg(long, short)]
    pub interval: Option<u64>,

    /// Minimum interval to use.
    #[arg(long, default_value = "10")]
    pub min_interval: u64,

    /// Stop after this many cycles.
    #[arg(long)]
    pub cycles: Option<u64>,
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let refresh_interval = args
        .interval
        .map_or_else(|| config.interval(), Duration::from_secs)
        .max(Duration::from_secs(args.min_interval));

    let collector = config.build_collector()?;
    let cancel = cancel_on_ctrl_c();
    let ctx = config.fetch_context(cancel.clone())?;

    let store = MetricStore::new();
    let writer = RecordWriter::new(cli);
    let text = TextFormatter::for_stderr(cli.no_color);
    let json = JsonFormatter::new(cli.pretty);

    info!(interval = ?refresh_interval, "Starting watch mode");

    let mut ticker = interval(refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cycle = 0_u64;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        cycle += 1;

        let outcome = collector.gather(&ctx, &store).await;
        for record in store.drain() {
            writer.emit(record);
        }

        match outcome {
            Ok(report) => {
                if !cli.quiet {
                    match cli.format {
                        OutputFormat::Text => eprintln!(
                            "[{}] cycle {cycle}: {}",
                            chrono::Local::now().format("%H:%M:%S"),
                            text.format_report(&report)
                        ),
                        OutputFormat::Json => eprintln!("{}", json.format_report(&report)?),
                    }
                }
            }
            Err(FetchError::Cancelled) => break,
            Err(e) => {
                // The next tick starts a fresh cycle.
                error!(cycle, error = %e, transient = e.is_transient(), "Cycle failed");
            }
        }

        if args.cycles.is_some_and(|max| cycle >= max) {
            break;
        }
    }

    info!(cycles = cycle, "Watch stopped");
    Ok(())
}
