//! CLI command implementations.

pub mod browse;
pub mod config;
pub mod order;

use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::Select;
use storescan_commerce::runtime::EventLoop;
use storescan_commerce::session::{Action, Prompt};

use crate::context::Context;

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Store barcode or typed identifier.
    pub identifier: String,
}

/// Arguments for the order command.
#[derive(Args)]
pub struct OrderArgs {
    /// Store barcode or typed identifier.
    pub identifier: String,

    /// Item to order, as ID or ID=QTY with QTY up to 999. Repeatable.
    #[arg(short, long = "item", value_name = "ID[=QTY]", required = true)]
    pub items: Vec<String>,

    /// Skip confirmation and fail instead of prompting to retry.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Drain outstanding requests behind a spinner.
pub(crate) async fn settle(ctx: &Context, event_loop: &mut EventLoop, msg: &str) {
    if event_loop.in_flight() == 0 {
        return;
    }
    let spinner = ctx.output.spinner(msg);
    event_loop.settle().await;
    spinner.finish_and_clear();
}

/// Message shown with a Retry / Cancel prompt.
pub(crate) fn prompt_message(prompt: &Prompt<'_>) -> String {
    match prompt {
        Prompt::CatalogFailed(err) => err.to_string(),
        Prompt::OrderFailed(err) => format!("Order Failed: {}", err),
    }
}

/// Ask the user to Retry or Cancel the failed operation.
pub(crate) fn ask_retry(message: &str) -> Result<Action> {
    let selection = Select::new()
        .with_prompt(message)
        .items(&["Retry", "Cancel"])
        .default(0)
        .interact()?;
    Ok(if selection == 0 {
        Action::Retry
    } else {
        Action::Cancel
    })
}
