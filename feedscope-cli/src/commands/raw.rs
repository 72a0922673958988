//! Raw command - print the listing envelope.

use anyhow::Result;
use clap::Args;

use super::{Selection, build_store, load_config};
use crate::Cli;
use crate::output::JsonFormatter;

/// Arguments for the raw command.
#[derive(Args)]
pub struct RawArgs {
    /// Which listing to print.
    #[command(flatten)]
    pub selection: Selection,
}

/// Runs the raw command. Output is always JSON.
pub async fn run(args: &RawArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let store = build_store(&config, cli)?;
    let listing = args.selection.fetch(&store, &config).await?;

    let formatter = JsonFormatter::new(cli.pretty);
    println!("{}", formatter.format(&listing)?);
    Ok(())
}
