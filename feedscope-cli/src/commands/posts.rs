//! Posts command - show a category listing.

use anyhow::{Result, bail};
use clap::Args;
use feedscope_core::Category;
use tracing::{info, warn};

use super::{build_store, load_config, print_feed};
use crate::Cli;

/// Arguments for the posts command.
#[derive(Args, Default)]
pub struct PostsArgs {
    /// Category key (see `feedscope categories`).
    #[arg(long, short)]
    pub category: Option<String>,
}

/// Runs the posts command.
pub async fn run(args: &PostsArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let category = args
        .category
        .clone()
        .unwrap_or_else(|| config.client.default_category.clone());

    if Category::find(&category).is_none() {
        warn!(category = %category, "Unknown category, showing popular posts");
    }

    let store = build_store(&config, cli)?;
    store.set_category(category.as_str());
    info!(category = %category, "Fetching listing");

    match store.fetch_listing().await {
        Ok(listing) => print_feed(&store, &listing, cli),
        Err(failure) => bail!(failure.message),
    }
}
