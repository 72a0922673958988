// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Feedscope CLI - browse subreddit listings from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Run the proxy on 127.0.0.1:3000
//! feedscope serve
//!
//! # Popular posts through the proxy
//! feedscope
//!
//! # One category
//! feedscope posts --category technology
//!
//! # Search
//! feedscope search "cake recipes & tips"
//!
//! # One post in detail
//! feedscope show abc123 --category science
//!
//! # JSON output
//! feedscope posts --format json --pretty
//!
//! # Skip the proxy and call upstream directly
//! feedscope --direct posts
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{categories, config, posts, raw, search, serve, show};

// ============================================================================
// CLI Definition
// ============================================================================

/// Feedscope CLI - subreddit listings with retry and fallback.
#[derive(Parser)]
#[command(name = "feedscope")]
#[command(about = "Browse subreddit listings through a retrying proxy")]
#[command(long_about = r#"
Feedscope fetches subreddit listings through a small proxy that retries
upstream failures and serves sample data when upstream stays unavailable.

Upstream credentials come from the environment:
  REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET, REDDIT_USER_AGENT

Examples:
  feedscope serve                         # Start the proxy
  feedscope                               # Popular posts
  feedscope posts --category gaming       # One category
  feedscope search "rust async"           # Search
  feedscope categories                    # List categories
  feedscope --format json posts           # JSON output
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'posts' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Proxy base URL (overrides the config file).
    #[arg(long, global = true)]
    pub proxy_url: Option<String>,

    /// Call upstream directly instead of going through the proxy.
    #[arg(long, global = true)]
    pub direct: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the proxy server.
    Serve(serve::ServeArgs),

    /// Show a category listing (default if no command specified).
    #[command(visible_alias = "p")]
    Posts(posts::PostsArgs),

    /// Search posts.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Show one post in detail.
    Show(show::ShowArgs),

    /// Print the listing envelope exactly as served.
    Raw(raw::RawArgs),

    /// List the category catalog.
    #[command(visible_alias = "c")]
    Categories,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Requested post not found.
    NotFound = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, server: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("feedscope=debug,info")
    } else if server {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("feedscope=warn")
    };

    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    if server {
        tracing_subscriber::registry().with(layer).with(filter).init();
    } else {
        tracing_subscriber::registry()
            .with(layer.without_time())
            .with(filter)
            .init();
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(
        cli.verbose,
        cli.quiet,
        matches!(cli.command, Some(Commands::Serve(_))),
    );

    let result = match &cli.command {
        Some(Commands::Serve(args)) => serve::run(args, &cli).await,
        Some(Commands::Posts(args)) => posts::run(args, &cli).await,
        Some(Commands::Search(args)) => search::run(args, &cli).await,
        Some(Commands::Show(args)) => show::run(args, &cli).await,
        Some(Commands::Raw(args)) => raw::run(args, &cli).await,
        Some(Commands::Categories) => categories::run(&cli),
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        None => posts::run(&posts::PostsArgs::default(), &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
