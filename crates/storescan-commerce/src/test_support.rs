//! Fixtures shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::StoreApi;
use crate::catalog::{Catalog, Category, Item, Store};
use crate::checkout::{Order, OrderRequest, OrderStatus};
use crate::error::{CatalogError, NetworkError};
use crate::ids::{OrderId, StoreIdentifier};
use crate::money::{Currency, Money};

/// Two categories, four items, one of them in a category the store does
/// not list.
pub(crate) fn sample_catalog() -> Catalog {
    let inr = |amount| Money::from_decimal(amount, Currency::INR);
    Catalog::new(
        Store::new("store-1", "Corner Mart"),
        vec![Category::new("dairy", "Dairy"), Category::new("bakery", "Bakery")],
        vec![
            Item::new("milk", "Milk", "dairy", inr(60.0)).with_discount(10.0),
            Item::new("curd", "Curd", "dairy", inr(40.0)),
            Item::new("bread", "Bread", "bakery", inr(35.0)).with_discount(5.0),
            Item::new("ghost", "Ice Cream", "frozen", inr(120.0)),
        ],
    )
}

pub(crate) struct MockApi {
    catalog: Catalog,
    fetch_error: Mutex<Option<CatalogError>>,
    fetch_calls: AtomicUsize,
    order_calls: AtomicUsize,
}

impl MockApi {
    pub(crate) fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            fetch_error: Mutex::new(None),
            fetch_calls: AtomicUsize::new(0),
            order_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn fail_fetch_with(&self, error: CatalogError) {
        *self.fetch_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn order_calls(&self) -> usize {
        self.order_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreApi for MockApi {
    async fn fetch_store(&self, _identifier: &StoreIdentifier) -> Result<Catalog, CatalogError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        match self.fetch_error.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(self.catalog.clone()),
        }
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<Order, NetworkError> {
        let n = self.order_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Order::from_request(
            OrderId::new(format!("order-{n}")),
            request,
            OrderStatus::Pending,
        ))
    }
}
