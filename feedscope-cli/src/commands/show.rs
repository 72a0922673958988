//! Show command - one post in detail.

use anyhow::Result;
use clap::Args;
use tracing::warn;

use super::{Selection, build_store, load_config};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Post id (e.g. `abc123`).
    pub id: String,

    /// Where to look for the post.
    #[command(flatten)]
    pub selection: Selection,
}

/// Runs the show command.
pub async fn run(args: &ShowArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let store = build_store(&config, cli)?;
    let listing = args.selection.fetch(&store, &config).await?;

    let id = args.id.trim_start_matches("t3_");
    let Some(post) = listing.find_post(id) else {
        warn!(id, posts = listing.len(), "Post not in listing");
        if !cli.quiet {
            eprintln!("Post '{id}' not found in {}", store.heading());
        }
        std::process::exit(ExitCode::NotFound as i32);
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_post_detail(post, listing.origin));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_post(post)?);
        }
    }

    Ok(())
}
