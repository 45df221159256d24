//! Procure CLI - command line client for the procurement services.
//!
//! Commands:
//! - `procure search` - Search products
//! - `procure reference` - Show locations and categories
//! - `procure new-item` - Submit a new item request
//! - `procure submissions` - List stored submissions
//! - `procure render` - Render a page to HTML
//! - `procure config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, NewItemArgs, ReferenceArgs, RenderArgs, SearchArgs, SubmissionsArgs};

/// Procure CLI - search products and file new item requests
#[derive(Parser)]
#[command(name = "procure")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the product catalog
    Search(SearchArgs),

    /// Show the location and category lists
    Reference(ReferenceArgs),

    /// Fill in and submit a new item request
    NewItem(NewItemArgs),

    /// List stored submissions
    Submissions(SubmissionsArgs),

    /// Render a page to HTML
    Render(RenderArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Search(args) => commands::search::run(args, &ctx).await,
        Commands::Reference(args) => commands::reference::run(args, &ctx).await,
        Commands::NewItem(args) => commands::new_item::run(args, &ctx).await,
        Commands::Submissions(args) => commands::submissions::run(args, &ctx).await,
        Commands::Render(args) => commands::render::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
