//! Ids command - walk the listing without fetching details.

use anyhow::Result;

use super::{cancel_on_ctrl_c, load_config};
use crate::output::{IdsOutput, JsonFormatter};
use crate::{Cli, OutputFormat};

/// Runs the ids command.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let collector = config.build_collector()?;
    let ctx = config.fetch_context(cancel_on_ctrl_c())?;

    let walk = collector.walker().walk(&ctx).await?;

    match cli.format {
        OutputFormat::Text => {
            for id in &walk.identifiers {
                println!("{id}");
            }
            if !cli.quiet {
                eprintln!(
                    "{} identifiers over {} pages ({} duplicates dropped)",
                    walk.identifiers.len(),
                    walk.pages,
                    walk.duplicates
                );
            }
        }
        OutputFormat::Json => {
            let output = IdsOutput {
                pages: walk.pages,
                duplicates: walk.duplicates,
                identifiers: &walk.identifiers,
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}
