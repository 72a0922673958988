//! CLI command implementations.

pub mod categories;
pub mod config;
pub mod posts;
pub mod raw;
pub mod search;
pub mod serve;
pub mod show;

use std::sync::Arc;

use anyhow::{Context, Result};
use feedscope_core::Listing;
use feedscope_fetch::ListingSource;
use feedscope_store::{Config, FeedStore};
use tracing::debug;

use crate::Cli;
use crate::output::{JsonFormatter, TextFormatter};
use crate::OutputFormat;

/// Loads the config file and applies environment and flag overrides.
pub async fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load()
        .await
        .context("failed to load configuration")?
        .with_env();
    if let Some(url) = &cli.proxy_url {
        config.client.proxy_url.clone_from(url);
    }
    Ok(config)
}

/// Picks the listing source: the proxy, or upstream with `--direct`.
pub fn listing_source(config: &Config, cli: &Cli) -> Result<Arc<dyn ListingSource>> {
    let source: Arc<dyn ListingSource> = if cli.direct {
        debug!("Using upstream gateway directly");
        Arc::new(config.gateway()?)
    } else {
        debug!(proxy = %config.client.proxy_url, "Using proxy");
        Arc::new(config.proxy_client()?)
    };
    Ok(source)
}

/// Builds a store over the configured source.
pub fn build_store(config: &Config, cli: &Cli) -> Result<FeedStore> {
    let source = listing_source(config, cli)?;
    Ok(FeedStore::with_options(source, config.store_options()))
}

/// Prints the store's current feed in the selected format.
pub fn print_feed(store: &FeedStore, listing: &Listing, cli: &Cli) -> Result<()> {
    let state = store.snapshot();
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_feed(&state.heading(), listing));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_feed(&state, listing)?);
        }
    }
    Ok(())
}

/// Listing selection shared by `show` and `raw`.
#[derive(clap::Args, Default)]
pub struct Selection {
    /// Category key.
    #[arg(long, short, conflicts_with = "search")]
    pub category: Option<String>,

    /// Search query instead of a category.
    #[arg(long, short)]
    pub search: Option<String>,
}

impl Selection {
    /// Fetches the selected listing through the store.
    pub async fn fetch(&self, store: &FeedStore, config: &Config) -> Result<Listing> {
        let result = match &self.search {
            Some(query) => store.search_posts(query).await,
            None => {
                let category = self
                    .category
                    .as_deref()
                    .unwrap_or(&config.client.default_category);
                store.set_category(category);
                store.fetch_listing().await
            }
        };
        result.map_err(|failure| anyhow::anyhow!(failure.message))
    }
}
