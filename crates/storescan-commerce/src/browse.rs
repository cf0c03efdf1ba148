//! Category grouping for display.

use crate::cart::CartEngine;
use crate::catalog::{Catalog, Category, Item};
use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// Which category, if any, is expanded. At most one at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expansion(Option<CategoryId>);

impl Expansion {
    /// Nothing expanded.
    pub fn collapsed() -> Self {
        Self(None)
    }

    /// Toggle a category.
    ///
    /// Toggling the expanded category collapses it; toggling any other one
    /// expands it in place of the previous one.
    pub fn toggle(&self, id: &CategoryId) -> Self {
        match &self.0 {
            Some(current) if current == id => Self(None),
            _ => Self(Some(id.clone())),
        }
    }

    pub fn expanded(&self) -> Option<&CategoryId> {
        self.0.as_ref()
    }

    pub fn is_expanded(&self, id: &CategoryId) -> bool {
        self.0.as_ref() == Some(id)
    }
}

/// An item paired with its current cart quantity.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemView<'a> {
    pub item: &'a Item,
    pub quantity: u32,
}

/// A category with the items listed under it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: &'a Category,
    pub expanded: bool,
    pub items: Vec<ItemView<'a>>,
}

/// Derived category -> items view over a catalog and cart.
///
/// Borrowing both inputs means every derivation reads the latest cart
/// quantities; nothing is cached between calls.
#[derive(Debug, Clone, Copy)]
pub struct CategoryTree<'a> {
    catalog: &'a Catalog,
    cart: &'a CartEngine,
    expansion: &'a Expansion,
}

impl<'a> CategoryTree<'a> {
    pub fn new(catalog: &'a Catalog, cart: &'a CartEngine, expansion: &'a Expansion) -> Self {
        Self {
            catalog,
            cart,
            expansion,
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Group catalog items by category, in catalog category order.
    ///
    /// Items whose category matches no catalog category are not listed.
    pub fn group_by_category(&self) -> Vec<CategoryGroup<'a>> {
        let cart = self.cart;
        self.catalog
            .categories
            .iter()
            .map(|category| CategoryGroup {
                category,
                expanded: self.expansion.is_expanded(&category.id),
                items: self
                    .catalog
                    .items_in(&category.id)
                    .map(|item| ItemView {
                        item,
                        quantity: cart.quantity_of(&item.id),
                    })
                    .collect(),
            })
            .collect()
    }

    /// The expanded group, if any.
    pub fn expanded_group(&self) -> Option<CategoryGroup<'a>> {
        self.group_by_category().into_iter().find(|g| g.expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ItemId;
    use crate::test_support::sample_catalog;

    #[test]
    fn test_toggle_same_collapses() {
        let dairy = CategoryId::new("dairy");
        let expansion = Expansion::collapsed().toggle(&dairy);
        assert!(expansion.is_expanded(&dairy));
        assert_eq!(expansion.toggle(&dairy), Expansion::collapsed());
    }

    #[test]
    fn test_toggle_other_switches() {
        let dairy = CategoryId::new("dairy");
        let bakery = CategoryId::new("bakery");
        let expansion = Expansion::collapsed().toggle(&dairy).toggle(&bakery);
        assert_eq!(expansion.expanded(), Some(&bakery));
        assert!(!expansion.is_expanded(&dairy));
    }

    #[test]
    fn test_group_by_category() {
        let catalog = sample_catalog();
        let cart = CartEngine::new(catalog.currency);
        let expansion = Expansion::collapsed();
        let groups = CategoryTree::new(&catalog, &cart, &expansion).group_by_category();

        let names: Vec<_> = groups.iter().map(|g| g.category.name.as_str()).collect();
        assert_eq!(names, vec!["Dairy", "Bakery"]);
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[1].items.len(), 1);
        assert!(groups.iter().all(|g| !g.expanded));
    }

    #[test]
    fn test_orphan_items_are_not_listed() {
        let catalog = sample_catalog();
        let cart = CartEngine::new(catalog.currency);
        let expansion = Expansion::collapsed();
        let groups = CategoryTree::new(&catalog, &cart, &expansion).group_by_category();
        let listed: usize = groups.iter().map(|g| g.items.len()).sum();
        assert_eq!(listed, catalog.items.len() - 1);
    }

    #[test]
    fn test_reflects_latest_cart_quantities() {
        let catalog = sample_catalog();
        let milk = catalog.item(&ItemId::new("milk")).unwrap();
        let expansion = Expansion::collapsed().toggle(&CategoryId::new("dairy"));

        let cart = CartEngine::new(catalog.currency);
        let before = CategoryTree::new(&catalog, &cart, &expansion)
            .expanded_group()
            .unwrap();
        assert_eq!(before.items[0].quantity, 0);

        let cart = cart.increment(milk).increment(milk);
        let after = CategoryTree::new(&catalog, &cart, &expansion)
            .expanded_group()
            .unwrap();
        assert_eq!(after.items[0].item.id, milk.id);
        assert_eq!(after.items[0].quantity, 2);
    }
}
