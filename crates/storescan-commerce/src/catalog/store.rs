//! Catalog graph and the store that resolves it.

use crate::api::StoreApi;
use crate::catalog::{Category, Item, Store};
use crate::error::CatalogError;
use crate::ids::{CategoryId, ItemId, StoreIdentifier};
use crate::money::Currency;
use serde::{Deserialize, Serialize};

/// The store, category and item graph for one identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub store: Store,
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
    /// Currency all item prices are expressed in.
    #[serde(default)]
    pub currency: Currency,
}

impl Catalog {
    pub fn new(store: Store, categories: Vec<Category>, items: Vec<Item>) -> Self {
        Self {
            store,
            categories,
            items,
            currency: Currency::default(),
        }
    }

    /// Set the catalog currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Get an item by ID.
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Items listed under a category, in catalog order.
    pub fn items_in(&self, category_id: &CategoryId) -> impl Iterator<Item = &Item> + '_ {
        let category_id = category_id.clone();
        self.items
            .iter()
            .filter(move |i| i.category_id == category_id)
    }

    /// Copy of this catalog with one item's display quantity replaced.
    pub fn with_display_quantity(&self, id: &ItemId, quantity: u32) -> Self {
        let mut next = self.clone();
        if let Some(item) = next.items.iter_mut().find(|i| &i.id == id) {
            item.display_quantity = quantity;
        }
        next
    }
}

/// Holds the catalog fetched for one resolved identifier.
///
/// Created once per identifier and read-only afterwards, apart from the
/// cosmetic display quantities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogStore {
    identifier: StoreIdentifier,
    catalog: Catalog,
}

impl CatalogStore {
    pub fn new(identifier: StoreIdentifier, catalog: Catalog) -> Self {
        Self {
            identifier,
            catalog,
        }
    }

    /// Fetch the catalog for an identifier.
    ///
    /// Issues exactly one request. Failures are returned to the caller, who
    /// decides whether to offer a retry.
    pub async fn fetch(
        api: &dyn StoreApi,
        identifier: StoreIdentifier,
    ) -> Result<Self, CatalogError> {
        tracing::info!(identifier = %identifier, "fetching store catalog");
        match api.fetch_store(&identifier).await {
            Ok(catalog) => {
                tracing::info!(
                    identifier = %identifier,
                    store = %catalog.store.id,
                    categories = catalog.categories.len(),
                    items = catalog.items.len(),
                    "store catalog loaded"
                );
                Ok(Self::new(identifier, catalog))
            }
            Err(e) => {
                tracing::warn!(identifier = %identifier, error = %e, "store catalog fetch failed");
                Err(e)
            }
        }
    }

    pub fn identifier(&self) -> &StoreIdentifier {
        &self.identifier
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &Store {
        &self.catalog.store
    }

    /// Copy with one item's display quantity replaced.
    pub fn with_display_quantity(&self, id: &ItemId, quantity: u32) -> Self {
        Self {
            identifier: self.identifier.clone(),
            catalog: self.catalog.with_display_quantity(id, quantity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::test_support::{sample_catalog, MockApi};

    #[test]
    fn test_item_lookup() {
        let catalog = sample_catalog();
        assert_eq!(catalog.item(&ItemId::new("milk")).unwrap().name, "Milk");
        assert!(catalog.item(&ItemId::new("missing")).is_none());
    }

    #[test]
    fn test_items_in_category() {
        let catalog = sample_catalog();
        let dairy: Vec<_> = catalog
            .items_in(&CategoryId::new("dairy"))
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(dairy, vec!["milk", "curd"]);
    }

    #[test]
    fn test_with_display_quantity_leaves_original() {
        let catalog = sample_catalog();
        let next = catalog.with_display_quantity(&ItemId::new("milk"), 3);
        assert_eq!(next.item(&ItemId::new("milk")).unwrap().display_quantity, 3);
        assert_eq!(catalog.item(&ItemId::new("milk")).unwrap().display_quantity, 0);
        assert_eq!(
            next.item(&ItemId::new("milk")).unwrap().mrp,
            Money::from_decimal(60.0, Currency::INR)
        );
    }

    #[tokio::test]
    async fn test_fetch_issues_one_request() {
        let api = MockApi::new(sample_catalog());
        let store = CatalogStore::fetch(&api, StoreIdentifier::new("8901"))
            .await
            .unwrap();
        assert_eq!(store.identifier().as_str(), "8901");
        assert_eq!(store.store().name, "Corner Mart");
        assert_eq!(api.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_surfaces_not_found_without_retry() {
        let api = MockApi::new(sample_catalog());
        api.fail_fetch_with(CatalogError::NotFound(StoreIdentifier::new("0000")));
        let err = CatalogStore::fetch(&api, StoreIdentifier::new("0000"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
        assert_eq!(api.fetch_calls(), 1);
    }
}
