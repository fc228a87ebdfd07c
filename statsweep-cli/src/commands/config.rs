//! Config command - inspect and create configuration.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use statsweep_store::CollectorConfig;
use tracing::info;

use super::load_config;
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print an annotated sample configuration.
    Sample,

    /// Show the effective configuration (API key masked).
    Show,

    /// Validate the configuration file.
    Validate,

    /// Show the configuration path.
    Path,

    /// Write a configuration file.
    Init {
        /// Write the YouTube preset for this playlist instead of the sample.
        #[arg(long)]
        youtube_playlist: Option<String>,

        /// API key for the YouTube preset.
        #[arg(long, requires = "youtube_playlist")]
        api_key: Option<String>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Sample => {
            print!("{}", CollectorConfig::sample_config());
            Ok(())
        }
        ConfigAction::Show => show_config(cli),
        ConfigAction::Validate => validate_config(cli),
        ConfigAction::Path => {
            println!("{}", config_path(cli).display());
            Ok(())
        }
        ConfigAction::Init {
            youtube_playlist,
            api_key,
            force,
        } => init_config(cli, youtube_playlist.as_deref(), api_key.as_deref(), *force),
    }
}

fn config_path(cli: &Cli) -> std::path::PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(CollectorConfig::default_path)
}

fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?.redacted();

    match cli.format {
        OutputFormat::Text => print!("{}", config.to_toml()?),
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(&config)?),
    }

    Ok(())
}

fn validate_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    if !cli.quiet {
        println!(
            "Configuration OK: {} ({} fields, listing {})",
            config_path(cli).display(),
            config.fields.len(),
            config.listing.url
        );
        if config.resolved_api_key().is_none() {
            println!("Note: no API key configured");
        }
    }

    Ok(())
}

fn init_config(
    cli: &Cli,
    youtube_playlist: Option<&str>,
    api_key: Option<&str>,
    force: bool,
) -> Result<()> {
    let path = config_path(cli);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    match youtube_playlist {
        Some(playlist) => {
            let mut config = CollectorConfig::youtube_playlist(playlist, api_key.unwrap_or_default());
            if api_key.is_none() {
                config.api_key = None;
                config.api_key_env = Some("YOUTUBE_API_KEY".to_string());
            }
            config.save_to(&path)?;
        }
        None => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, CollectorConfig::sample_config())?;
        }
    }

    info!(path = %path.display(), "Config written");
    if !cli.quiet {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
