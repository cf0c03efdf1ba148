//! storescan - browse a store catalog and place orders from the terminal.
//!
//! Commands:
//! - `storescan browse <IDENTIFIER>` - Interactive catalog and cart
//! - `storescan order <IDENTIFIER> --item ID[=QTY]` - Place an order directly
//! - `storescan config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;
mod view;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{BrowseArgs, ConfigArgs, OrderArgs};

/// storescan - Resolve a store barcode, build a cart and place an order
#[derive(Parser)]
#[command(name = "storescan")]
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
    /// Browse a store catalog and build a cart interactively
    Browse(BrowseArgs),

    /// Place an order without the interactive menu
    Order(OrderArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.json);

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    let result = match cli.command {
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Order(args) => commands::order::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
