//! Shopping cart module.
//!
//! Contains the cart engine, its lines with price snapshots, and the
//! derived totals.

mod cart;
mod pricing;

pub use cart::{CartEngine, CartLine};
pub use pricing::{CartTotals, LineTotals};
