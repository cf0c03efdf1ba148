//! Cart total calculations.

use crate::cart::CartLine;
use crate::ids::ItemId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Aggregate totals, always derived from the current lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of snapshot price times quantity.
    pub original_total: Money,
    /// Sum of snapshot discounted price times quantity. The amount charged.
    pub discounted_total: Money,
    /// `original_total - discounted_total`.
    pub savings: Money,
}

impl CartTotals {
    /// All-zero totals.
    pub fn zero(currency: Currency) -> Self {
        Self {
            original_total: Money::zero(currency),
            discounted_total: Money::zero(currency),
            savings: Money::zero(currency),
        }
    }

    /// Derive totals from cart lines.
    pub fn from_lines(lines: &[CartLine], currency: Currency) -> Self {
        let original_total = Money::sum(lines.iter().map(CartLine::original_subtotal), currency);
        let discounted_total =
            Money::sum(lines.iter().map(CartLine::discounted_subtotal), currency);
        Self {
            original_total,
            discounted_total,
            savings: original_total.saturating_sub(&discounted_total),
        }
    }

    /// Check if the cart saves anything over list price.
    pub fn has_savings(&self) -> bool {
        self.savings.is_positive()
    }

    /// Check if every total is zero.
    pub fn is_zero(&self) -> bool {
        self.original_total.is_zero() && self.discounted_total.is_zero() && self.savings.is_zero()
    }
}

/// Contribution of a single line to the cart totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineTotals {
    pub item_id: ItemId,
    pub quantity: u32,
    pub original: Money,
    pub discounted: Money,
    pub savings: Money,
}

impl From<&CartLine> for LineTotals {
    fn from(line: &CartLine) -> Self {
        let original = line.original_subtotal();
        let discounted = line.discounted_subtotal();
        Self {
            item_id: line.item_id.clone(),
            quantity: line.quantity,
            original,
            discounted,
            savings: original.saturating_sub(&discounted),
        }
    }
}
