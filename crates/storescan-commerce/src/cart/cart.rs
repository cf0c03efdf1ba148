//! Cart engine and cart line types.

use crate::cart::{CartTotals, LineTotals};
use crate::catalog::Item;
use crate::ids::ItemId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A cart entry binding one item to a quantity and its price snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Item being purchased.
    pub item_id: ItemId,
    /// Quantity, at least 1 while the line exists.
    pub quantity: u32,
    /// List price captured when the item first entered the cart.
    pub price: Money,
    /// Discount percentage captured with the price.
    pub discount_percent: f64,
    /// `price` minus the discount, captured with the price.
    pub discounted_price: Money,
}

impl CartLine {
    /// Create a line with quantity 1, snapshotting the item's current price.
    pub fn first_of(item: &Item) -> Self {
        Self {
            item_id: item.id.clone(),
            quantity: 1,
            price: item.mrp,
            discount_percent: item.discount_percent,
            discounted_price: item.discounted_price(),
        }
    }

    /// Snapshot price times quantity.
    pub fn original_subtotal(&self) -> Money {
        self.price.times(self.quantity)
    }

    /// Snapshot discounted price times quantity.
    pub fn discounted_subtotal(&self) -> Money {
        self.discounted_price.times(self.quantity)
    }
}

/// The mutable cart of a session.
///
/// Every operation returns a new engine computed from the complete prior
/// state; the receiver is never modified. Totals are derived from the lines
/// on demand and cannot drift from them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CartEngine {
    lines: Vec<CartLine>,
    currency: Currency,
}

impl CartEngine {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    /// Build a cart from existing lines, keeping their order.
    ///
    /// Lines are taken as given, so callers can represent carts that the
    /// engine itself would never produce.
    pub fn from_lines(lines: Vec<CartLine>, currency: Currency) -> Self {
        Self { lines, currency }
    }

    /// Add one unit of `item`.
    ///
    /// A new line snapshots the item's current price and discount. An
    /// existing line keeps its snapshot and only gains quantity.
    pub fn increment(&self, item: &Item) -> Self {
        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|l| l.item_id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => lines.push(CartLine::first_of(item)),
        }
        Self {
            lines,
            currency: self.currency,
        }
    }

    /// Remove one unit of `item_id`.
    ///
    /// The line is dropped when its quantity reaches zero. Decrementing an
    /// item that has no line is a no-op.
    pub fn decrement(&self, item_id: &ItemId) -> Self {
        let lines = self
            .lines
            .iter()
            .filter_map(|line| {
                if &line.item_id != item_id {
                    return Some(line.clone());
                }
                match line.quantity.saturating_sub(1) {
                    0 => None,
                    quantity => Some(CartLine {
                        quantity,
                        ..line.clone()
                    }),
                }
            })
            .collect();
        Self {
            lines,
            currency: self.currency,
        }
    }

    /// An empty cart in the same currency.
    pub fn cleared(&self) -> Self {
        Self::new(self.currency)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Get the line for an item.
    pub fn line(&self, item_id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.item_id == item_id)
    }

    /// Current cart quantity of an item (0 without a line).
    pub fn quantity_of(&self, item_id: &ItemId) -> u32 {
        self.line(item_id).map(|l| l.quantity).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct items (the cart badge).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Totals derived from the current lines.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from_lines(&self.lines, self.currency)
    }

    /// Per-line breakdown of the totals.
    pub fn line_totals(&self) -> Vec<LineTotals> {
        self.lines.iter().map(LineTotals::from).collect()
    }
}
