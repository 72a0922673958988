//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use feedscope_store::{Config, default_config_dir};
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
    /// Show the effective configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Init { force } => init_config(*force).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let gateway = config.gateway_config(|key| std::env::var(key).ok());

    match cli.format {
        OutputFormat::Text => {
            println!("Feedscope Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Proxy:");
            println!("  Bind:             {}", config.proxy.bind);
            println!("  Serve fallback:   {}", config.proxy.serve_fallback);
            println!("  Listing attempts: {}", config.proxy.listing_attempts);
            println!("  Search attempts:  {}", config.proxy.search_attempts);
            println!();
            println!("Upstream:");
            println!("  User agent:       {}", gateway.user_agent);
            println!("  Require creds:    {}", config.upstream.require_credentials);
            println!("  Auth mode:        {:?}", gateway.auth_mode());
            if let Some(base) = &config.upstream.base_url {
                println!("  Base URL:         {base}");
            }
            println!();
            println!("Client:");
            println!("  Proxy URL:        {}", config.client.proxy_url);
            println!("  Page size:        {}", config.client.limit);
            println!("  Default category: {}", config.client.default_category);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&config)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let config_path = Config::default_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:  {}", config_dir.display());
            println!("Config file: {}", config_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "config_file": config_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn init_config(force: bool) -> Result<()> {
    let path = Config::default_path();

    if path.exists() && !force {
        println!("Config file already exists: {}", path.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    Config::default().save_to(&path).await?;
    info!(path = %path.display(), "Config initialized");
    println!("Wrote {}", path.display());

    Ok(())
}
