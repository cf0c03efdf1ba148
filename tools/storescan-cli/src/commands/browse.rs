//! Interactive catalog browsing.

use anyhow::Result;
use dialoguer::Select;
use storescan_commerce::recovery::{Frame, RecoveryShell};
use storescan_commerce::session::{Action, CatalogState, Notice};
use storescan_commerce::StoreIdentifier;

use super::{ask_retry, prompt_message, settle, BrowseArgs};
use crate::context::Context;
use crate::view::{self, Choice};

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let identifier = StoreIdentifier::parse(&args.identifier)?;
    let mut event_loop = ctx.event_loop()?;
    let mut shell = RecoveryShell::new();

    event_loop.dispatch(Action::Resolve(identifier));

    loop {
        settle(ctx, &mut event_loop, "Loading store details...").await;
        let state = event_loop.state();

        if let Some(prompt) = state.prompt() {
            let action = ask_retry(&prompt_message(&prompt))?;
            event_loop.dispatch(action);
            continue;
        }

        if let Some(Notice::OrderPlaced { order_id, total }) = &state.notice {
            ctx.output.success(&format!(
                "Your order has been placed successfully! ({}, {})",
                order_id, total
            ));
            event_loop.dispatch(Action::DismissNotice);
            continue;
        }

        if let CatalogState::Unavailable { .. } = state.catalog {
            let selection = Select::new()
                .with_prompt("Store details are unavailable")
                .items(&["Retry", "Quit"])
                .default(0)
                .interact()?;
            if selection == 0 {
                event_loop.dispatch(Action::Retry);
                continue;
            }
            return Ok(());
        }

        match shell.render(|| view::render_session(state)) {
            Frame::Rendered(text) => {
                ctx.output.block("\n");
                ctx.output.block(&text);
            }
            Frame::Faulted(fault) => {
                ctx.output.error(&format!("Something went wrong: {}", fault));
                let selection = Select::new()
                    .with_prompt("The view could not be shown")
                    .items(&["Try again", "Quit"])
                    .default(0)
                    .interact()?;
                if selection == 0 {
                    shell.reset();
                    continue;
                }
                return Ok(());
            }
        }

        let entries = view::menu(state);
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        let selection = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match entries.into_iter().nth(selection).map(|e| e.choice) {
            Some(Choice::Act(action)) => {
                ctx.output.debug(&format!("{:?}", action));
                event_loop.dispatch(action);
            }
            Some(Choice::Quit) | None => return Ok(()),
        }
    }
}
