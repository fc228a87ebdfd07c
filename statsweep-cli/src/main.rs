// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Statsweep CLI - collect numeric metrics from paginated JSON APIs.
//!
//! # Examples
//!
//! ```bash
//! # Run one gather cycle with the default config file
//! statsweep
//!
//! # Use a specific config file, JSON lines output
//! statsweep --config ./youtube.toml --format json gather
//!
//! # Only list the item identifiers
//! statsweep ids
//!
//! # Gather every 5 minutes until Ctrl+C
//! statsweep watch --interval 300
//!
//! # Write an annotated sample config
//! statsweep config sample > config.toml
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{config, gather, ids, watch};
use statsweep_fetch::FetchError;
use statsweep_store::StoreError;

// ============================================================================
// CLI Definition
// ============================================================================

/// Statsweep CLI - metrics collection for paginated JSON APIs.
#[derive(Parser)]
#[command(name = "statsweep")]
#[command(about = "Collect numeric metrics from paginated JSON REST APIs")]
#[command(long_about = r#"
Statsweep walks a paginated listing endpoint, fetches the detail document of
every item it finds, and extracts numeric fields into tagged metric records.

Examples:
  statsweep                          # One gather cycle
  statsweep --format json            # JSON lines output
  statsweep ids                      # Walk the listing only
  statsweep watch --interval 300     # Gather on a schedule
  statsweep config sample            # Print a sample config
"#)]
#[command(version)]
#[command(author = "Statsweep Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'gather' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the config file.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run one gather cycle (default if no command specified).
    #[command(visible_alias = "g")]
    Gather(gather::GatherArgs),

    /// Run gather cycles on an interval until interrupted.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Walk the listing and print item identifiers.
    Ids,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON lines for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// Configuration missing or invalid.
    ConfigError = 2,
    /// Interrupted.
    Cancelled = 130,
}

impl ExitCode {
    fn for_error(err: &anyhow::Error) -> Self {
        if err
            .downcast_ref::<StoreError>()
            .is_some_and(StoreError::is_config_error)
        {
            return Self::ConfigError;
        }
        match err.downcast_ref::<FetchError>() {
            Some(FetchError::Cancelled) => Self::Cancelled,
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("statsweep=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("statsweep=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Gather(args)) => gather::run(args, &cli).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli).await,
        Some(Commands::Ids) => ids::run(&cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli),
        None => gather::run(&gather::GatherArgs::default(), &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}
