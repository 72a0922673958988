//! Categories command - list the catalog.

use anyhow::Result;
use feedscope_core::Category;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the categories command.
pub fn run(cli: &Cli) -> Result<()> {
    let categories = Category::all();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_categories_header());
            println!("{}", "─".repeat(70));
            for category in categories {
                println!("{}", formatter.format_category_line(category));
            }
            println!();
            println!("Total: {} categories", categories.len());
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_categories(categories)?);
        }
    }

    Ok(())
}
