//! Serve command - run the proxy server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use feedscope_fetch::AuthMode;
use feedscope_proxy::{FallbackMode, ProxyState};
use tracing::{info, warn};

use super::load_config;
use crate::Cli;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Listen address (overrides the config file).
    #[arg(long, short)]
    pub bind: Option<SocketAddr>,

    /// Answer upstream failures with 500 instead of sample data.
    #[arg(long)]
    pub no_fallback: bool,

    /// Call upstream without credentials when none are configured.
    #[arg(long)]
    pub anonymous: bool,
}

/// Runs the serve command.
pub async fn run(args: &ServeArgs, cli: &Cli) -> Result<()> {
    let mut config = load_config(cli).await?;
    if args.anonymous {
        config.upstream.require_credentials = false;
    }
    if args.no_fallback {
        config.proxy.serve_fallback = false;
    }

    let addr = match args.bind {
        Some(addr) => addr,
        None => config.bind_addr()?,
    };

    let gateway = config.gateway().context("failed to build upstream gateway")?;
    match gateway.auth_mode() {
        AuthMode::ClientCredentials => info!("Upstream credentials configured"),
        AuthMode::Anonymous => info!("No upstream credentials, calling anonymously"),
        AuthMode::Unavailable => {
            warn!("No upstream credentials, every listing will be sample data");
        }
    }

    let (listing_retry, search_retry) = config.proxy_retry();
    let state = ProxyState::new(Arc::new(gateway))
        .with_retry(listing_retry, search_retry)
        .with_fallback(FallbackMode::from_flag(config.proxy.serve_fallback))
        .shared();

    feedscope_proxy::serve(addr, state).await?;
    Ok(())
}
