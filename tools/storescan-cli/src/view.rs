//! Text rendering of a session and the menu built from it.

use std::fmt::Write as _;

use console::style;
use storescan_commerce::browse::CategoryGroup;
use storescan_commerce::session::{Action, SessionState};
use storescan_commerce::RenderFault;

/// What picking a menu entry does.
#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    Act(Action),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub label: String,
    pub choice: Choice,
}

impl MenuItem {
    fn act(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            choice: Choice::Act(action),
        }
    }
}

fn fault(err: std::fmt::Error) -> RenderFault {
    RenderFault::new(err.to_string())
}

fn render_group<W: std::fmt::Write>(
    out: &mut W,
    group: &CategoryGroup<'_>,
) -> Result<(), RenderFault> {
    let marker = if group.expanded { "▾" } else { "▸" };
    writeln!(
        out,
        "{} {} ({})",
        marker,
        style(&group.category.name).bold(),
        group.items.len()
    )
    .map_err(fault)?;
    if !group.expanded {
        return Ok(());
    }
    for view in &group.items {
        let item = view.item;
        let mut line = format!("    {:<24} {}", item.name, item.discounted_price());
        if item.has_discount() {
            write!(line, "  (MRP {}, {}% OFF)", item.mrp, item.discount_percent)
                .map_err(fault)?;
        }
        if view.quantity > 0 {
            write!(line, "  x{}", view.quantity).map_err(fault)?;
        }
        writeln!(out, "{line}").map_err(fault)?;
    }
    Ok(())
}

/// Render the catalog tree and cart summary.
///
/// Fails when a cart line points at an item the catalog does not carry.
pub fn render_session(state: &SessionState) -> Result<String, RenderFault> {
    let (Some(store), Some(tree)) = (state.store(), state.tree()) else {
        return Ok(String::new());
    };
    let catalog = tree.catalog();
    let mut out = String::new();

    writeln!(out, "{}", style(&store.name).bold().underlined()).map_err(fault)?;
    for group in tree.group_by_category() {
        render_group(&mut out, &group)?;
    }

    if state.cart.is_empty() {
        writeln!(out, "\nCart is empty").map_err(fault)?;
        return Ok(out);
    }

    writeln!(out, "\nCart ({} items)", state.cart.line_count()).map_err(fault)?;
    for line in state.cart.line_totals() {
        let item = catalog.item(&line.item_id).ok_or_else(|| {
            RenderFault::new(format!("cart line {} has no catalog item", line.item_id))
        })?;
        writeln!(
            out,
            "    {:<24} x{:<3} {}",
            item.name, line.quantity, line.discounted
        )
        .map_err(fault)?;
    }

    let totals = state.totals();
    writeln!(out, "  Total MRP:   {}", totals.original_total).map_err(fault)?;
    if totals.has_savings() {
        writeln!(out, "  You save:    {}", style(totals.savings).green()).map_err(fault)?;
    }
    writeln!(out, "  Final Price: {}", style(totals.discounted_total).bold()).map_err(fault)?;
    Ok(out)
}

/// Menu entries for the current state, in display order.
pub fn menu(state: &SessionState) -> Vec<MenuItem> {
    let mut items = Vec::new();
    if let Some(tree) = state.tree() {
        for group in tree.group_by_category() {
            let verb = if group.expanded { "Collapse" } else { "Expand" };
            items.push(MenuItem::act(
                format!("{} {}", verb, group.category.name),
                Action::ToggleCategory(group.category.id.clone()),
            ));
            if !group.expanded {
                continue;
            }
            for view in &group.items {
                items.push(MenuItem::act(
                    format!("  + Add {}", view.item.name),
                    Action::Increment(view.item.id.clone()),
                ));
                if view.quantity > 0 {
                    items.push(MenuItem::act(
                        format!("  - Remove {} (x{})", view.item.name, view.quantity),
                        Action::Decrement(view.item.id.clone()),
                    ));
                }
            }
        }
        if !state.cart.is_empty() {
            items.push(MenuItem::act(
                format!("Place order ({})", state.totals().discounted_total),
                Action::SubmitOrder,
            ));
        }
    }
    items.push(MenuItem {
        label: "Quit".to_string(),
        choice: Choice::Quit,
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use storescan_commerce::prelude::*;

    fn loaded() -> SessionState {
        let identifier = StoreIdentifier::new("8901");
        let inr = |v| Money::from_decimal(v, Currency::INR);
        let catalog = Catalog::new(
            Store::new("s1", "Corner Mart"),
            vec![Category::new("dairy", "Dairy"), Category::new("bakery", "Bakery")],
            vec![
                Item::new("milk", "Milk", "dairy", inr(60.0)).with_discount(10.0),
                Item::new("bread", "Bread", "bakery", inr(35.0)),
            ],
        );
        let (state, _) = update(&SessionState::new(Currency::INR), Action::Resolve(identifier.clone()));
        let (state, _) = update(
            &state,
            Action::CatalogLoaded {
                identifier,
                result: Ok(catalog),
            },
        );
        state
    }

    fn apply(state: SessionState, actions: Vec<Action>) -> SessionState {
        actions
            .into_iter()
            .fold(state, |s, a| update(&s, a).0)
    }

    #[test]
    fn test_render_collapsed_catalog() {
        let text = render_session(&loaded()).unwrap();
        assert!(text.contains("Corner Mart"));
        assert!(text.contains("Dairy"));
        assert!(text.contains("Bakery"));
        assert!(!text.contains("Milk"));
        assert!(text.contains("Cart is empty"));
    }

    #[test]
    fn test_render_expanded_with_cart() {
        let state = apply(
            loaded(),
            vec![
                Action::ToggleCategory(CategoryId::new("dairy")),
                Action::Increment(ItemId::new("milk")),
                Action::Increment(ItemId::new("milk")),
            ],
        );
        let text = render_session(&state).unwrap();
        assert!(text.contains("10% OFF"));
        assert!(text.contains("x2"));
        assert!(text.contains("Total MRP:   ₹120.00"));
        assert!(text.contains("₹108.00"));
    }

    struct Refusing;

    impl std::fmt::Write for Refusing {
        fn write_str(&mut self, _: &str) -> std::fmt::Result {
            Err(std::fmt::Error)
        }
    }

    #[test]
    fn test_render_group_reports_write_errors() {
        let state = apply(
            loaded(),
            vec![
                Action::ToggleCategory(CategoryId::new("dairy")),
                Action::Increment(ItemId::new("milk")),
            ],
        );
        let group = state.tree().unwrap().expanded_group().unwrap();

        let mut text = String::new();
        render_group(&mut text, &group).unwrap();
        assert!(text.contains("(MRP ₹60.00, 10% OFF)  x1"));

        assert!(render_group(&mut Refusing, &group).is_err());
    }

    #[test]
    fn test_render_faults_on_orphan_cart_line() {
        let mut state = apply(loaded(), vec![Action::Increment(ItemId::new("milk"))]);
        let ghost = Item::new("ghost", "Ghost", "dairy", Money::from_decimal(5.0, Currency::INR));
        state.cart = state.cart.increment(&ghost);
        assert!(render_session(&state).is_err());
    }

    #[test]
    fn test_menu_follows_expansion_and_cart() {
        let state = loaded();
        let labels: Vec<_> = menu(&state).into_iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["Expand Dairy", "Expand Bakery", "Quit"]);

        let state = apply(
            state,
            vec![
                Action::ToggleCategory(CategoryId::new("dairy")),
                Action::Increment(ItemId::new("milk")),
            ],
        );
        let entries = menu(&state);
        let labels: Vec<_> = entries.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Collapse Dairy",
                "  + Add Milk",
                "  - Remove Milk (x1)",
                "Expand Bakery",
                "Place order (₹54.00)",
                "Quit",
            ]
        );
        assert_eq!(entries[4].choice, Choice::Act(Action::SubmitOrder));
    }

    #[test]
    fn test_menu_without_catalog_only_quits() {
        let entries = menu(&SessionState::new(Currency::INR));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].choice, Choice::Quit);
    }
}
