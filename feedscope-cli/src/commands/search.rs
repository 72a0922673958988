//! Search command.

use anyhow::{Result, bail};
use clap::Args;
use tracing::info;

use super::{build_store, load_config, print_feed};
use crate::Cli;

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search terms (joined with spaces).
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl SearchArgs {
    /// Returns the terms as one query string.
    pub fn query(&self) -> String {
        self.query.join(" ")
    }
}

/// Runs the search command.
pub async fn run(args: &SearchArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let store = build_store(&config, cli)?;
    let query = args.query();
    info!(query = %query, "Searching");

    match store.search_posts(&query).await {
        Ok(listing) => print_feed(&store, &listing, cli),
        Err(failure) => bail!(failure.message),
    }
}
