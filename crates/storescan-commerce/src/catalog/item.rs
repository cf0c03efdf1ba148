//! Catalog item type.

use crate::ids::{CategoryId, ItemId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// An item offered by a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Category this item is listed under.
    pub category_id: CategoryId,
    /// List price (MRP).
    pub mrp: Money,
    /// Discount percentage in `[0, 100]`.
    pub discount_percent: f64,
    /// Cart quantity mirrored for rendering only. Not order data.
    #[serde(default)]
    pub display_quantity: u32,
}

impl Item {
    /// Create a new item with no discount.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        category_id: impl Into<CategoryId>,
        mrp: Money,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category_id: category_id.into(),
            mrp,
            discount_percent: 0.0,
            display_quantity: 0,
        }
    }

    /// Set the discount percentage.
    pub fn with_discount(mut self, percent: f64) -> Self {
        self.discount_percent = percent;
        self
    }

    /// Unit price after discount.
    pub fn discounted_price(&self) -> Money {
        self.mrp.discounted_by(self.discount_percent)
    }

    /// Check whether a discount badge should be shown.
    pub fn has_discount(&self) -> bool {
        self.discount_percent > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_discounted_price() {
        let item = Item::new("i1", "Milk", "dairy", Money::from_decimal(100.0, Currency::INR))
            .with_discount(20.0);
        assert_eq!(item.discounted_price().amount_minor, 8000);
        assert!(item.has_discount());
    }

    #[test]
    fn test_display_quantity_defaults_when_absent() {
        let json = r#"{
            "id": "i1",
            "name": "Bread",
            "category_id": "bakery",
            "mrp": {"amount_minor": 4000, "currency": "INR"},
            "discount_percent": 0.0
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.display_quantity, 0);
        assert!(!item.has_discount());
    }
}
