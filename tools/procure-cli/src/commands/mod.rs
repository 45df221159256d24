//! CLI command implementations.

pub mod config;
pub mod new_item;
pub mod reference;
pub mod render;
pub mod search;
pub mod submissions;

use clap::{Args, Subcommand};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search terms (joined with spaces).
    pub query: Vec<String>,

    /// Show at most N products.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the reference command.
#[derive(Args)]
pub struct ReferenceArgs {
    /// Only show locations.
    #[arg(long, conflicts_with = "categories")]
    pub locations: bool,

    /// Only show categories.
    #[arg(long)]
    pub categories: bool,
}

/// Arguments for the new-item command.
///
/// Fields not given as flags are prompted for when running in a terminal.
#[derive(Args, Default)]
pub struct NewItemArgs {
    /// Name of the supplier.
    #[arg(long)]
    pub supplier: Option<String>,

    /// Information about the product.
    #[arg(long)]
    pub product_info: Option<String>,

    /// Product website URL.
    #[arg(long)]
    pub product_url: Option<String>,

    /// Category id.
    #[arg(long)]
    pub category: Option<String>,

    /// Quantity required.
    #[arg(long)]
    pub quantity: Option<String>,

    /// When it is required (YYYY-MM-DD).
    #[arg(long)]
    pub timeline: Option<String>,

    /// Location.
    #[arg(long)]
    pub location: Option<String>,

    /// Who or what it is required for.
    #[arg(long)]
    pub required_for: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    /// Wait until the confirmation window closes.
    #[arg(long)]
    pub keep_open: bool,
}

/// Arguments for the submissions command.
#[derive(Args)]
pub struct SubmissionsArgs {
    /// Show only the last N submissions.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Route to render.
    #[arg(short, long, default_value = "/")]
    pub route: String,

    /// Run a search first so the results grid is populated.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Write the HTML to a file instead of stdout.
    #[arg(short, long)]
    pub out: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
