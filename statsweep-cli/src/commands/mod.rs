//! CLI command implementations.

pub mod config;
pub mod gather;
pub mod ids;
pub mod watch;

use anyhow::Result;
use statsweep_fetch::CancellationToken;
use statsweep_store::CollectorConfig;
use tracing::{debug, info};

use crate::Cli;

/// Loads the config from `--config` or the default path.
pub fn load_config(cli: &Cli) -> Result<CollectorConfig> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(CollectorConfig::default_path);
    debug!(path = %path.display(), "Loading config");
    Ok(CollectorConfig::load_from(&path)?)
}

/// Returns a token that is cancelled when the process receives Ctrl+C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling");
            token.cancel();
        }
    });
    cancel
}
