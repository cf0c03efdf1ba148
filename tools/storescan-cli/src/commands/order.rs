//! Non-interactive order placement.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use serde::Serialize;
use storescan_commerce::runtime::EventLoop;
use storescan_commerce::session::{Action, CatalogState, Notice};
use storescan_commerce::{ItemId, StoreIdentifier};

use super::{ask_retry, prompt_message, settle, OrderArgs};
use crate::context::Context;
use crate::view;

/// Largest quantity one `--item` may ask for.
pub const MAX_QUANTITY: u32 = 999;

/// One `--item` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub id: ItemId,
    pub quantity: u32,
}

impl ItemSpec {
    /// Parse `ID` or `ID=QTY`. The last `=` separates the quantity.
    pub fn parse(raw: &str) -> Result<Self> {
        let (id, quantity) = match raw.rsplit_once('=') {
            Some((id, qty)) => {
                let quantity: u32 = qty
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid quantity in '{}'", raw))?;
                (id, quantity)
            }
            None => (raw, 1),
        };
        let id = id.trim();
        if id.is_empty() {
            bail!("Missing item ID in '{}'", raw);
        }
        if !(1..=MAX_QUANTITY).contains(&quantity) {
            bail!("Quantity must be between 1 and {} in '{}'", MAX_QUANTITY, raw);
        }
        Ok(Self {
            id: ItemId::new(id),
            quantity,
        })
    }
}

#[derive(Serialize)]
struct PlacedOrder<'a> {
    order_id: &'a str,
    total: f64,
    currency: &'a str,
}

/// Run the order command.
pub async fn run(args: OrderArgs, ctx: &Context) -> Result<()> {
    let identifier = StoreIdentifier::parse(&args.identifier)?;
    let specs = args
        .items
        .iter()
        .map(|raw| ItemSpec::parse(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut event_loop = ctx.event_loop()?;
    event_loop.dispatch(Action::Resolve(identifier));
    resolve_prompts(ctx, &mut event_loop, args.yes, "Loading store details...").await?;

    if let CatalogState::Unavailable { error, .. } = &event_loop.state().catalog {
        bail!("{}", error);
    }

    for spec in &specs {
        let known = event_loop
            .state()
            .catalog_store()
            .is_some_and(|store| store.catalog().item(&spec.id).is_some());
        if !known {
            bail!("Unknown item: {}", spec.id);
        }
        for _ in 0..spec.quantity {
            event_loop.dispatch(Action::Increment(spec.id.clone()));
        }
    }

    let summary = view::render_session(event_loop.state())?;
    ctx.output.block(&summary);

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt("Place this order?")
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Order cancelled");
            return Ok(());
        }
    }

    event_loop.dispatch(Action::SubmitOrder);
    resolve_prompts(ctx, &mut event_loop, args.yes, "Placing order...").await?;

    match &event_loop.state().notice {
        Some(Notice::OrderPlaced { order_id, total }) => {
            if ctx.output.is_json() {
                ctx.output.json(&PlacedOrder {
                    order_id: order_id.as_str(),
                    total: total.to_decimal(),
                    currency: total.currency.code(),
                });
            } else {
                ctx.output.success("Your order has been placed successfully!");
                ctx.output.kv("order", order_id.as_str());
                ctx.output.kv("total", &total.to_string());
            }
            Ok(())
        }
        _ => {
            ctx.output.warn("Order was not placed");
            Ok(())
        }
    }
}

/// Settle requests and answer Retry / Cancel prompts until none remain.
///
/// With `fail_fast` the first prompt becomes an error.
async fn resolve_prompts(
    ctx: &Context,
    event_loop: &mut EventLoop,
    fail_fast: bool,
    msg: &str,
) -> Result<()> {
    loop {
        settle(ctx, event_loop, msg).await;
        let Some(prompt) = event_loop.state().prompt() else {
            return Ok(());
        };
        let message = prompt_message(&prompt);
        if fail_fast || !prompt.error().is_retryable() {
            bail!("{}", message);
        }
        let action = ask_retry(&message)?;
        event_loop.dispatch(action);
    }
}
