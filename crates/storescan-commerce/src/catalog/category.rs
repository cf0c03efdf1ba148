//! Store and category types.

use crate::ids::{CategoryId, StoreId};
use serde::{Deserialize, Serialize};

/// The store a catalog belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Store {
    /// Unique store identifier.
    pub id: StoreId,
    /// Display name.
    pub name: String,
}

impl Store {
    pub fn new(id: impl Into<StoreId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A category grouping items in a store catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
