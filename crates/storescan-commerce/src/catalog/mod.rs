//! Store catalog module.
//!
//! Contains the read-only store, category and item graph resolved from an
//! identifier, and the store that fetches and holds it.

mod category;
mod item;
mod store;

pub use category::{Category, Store};
pub use item::Item;
pub use store::{Catalog, CatalogStore};
