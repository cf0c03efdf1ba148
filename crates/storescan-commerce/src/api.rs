//! The remote operations the core consumes.

use async_trait::async_trait;

use crate::catalog::Catalog;
use crate::checkout::{Order, OrderRequest};
use crate::error::{CatalogError, NetworkError};
use crate::ids::StoreIdentifier;

/// Remote store backend: one catalog lookup and one order creation.
///
/// Implementations perform no retries and no timeouts; every retry is
/// initiated by the user.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// `GET /stores/{identifier}`.
    async fn fetch_store(&self, identifier: &StoreIdentifier) -> Result<Catalog, CatalogError>;

    /// `POST /orders`.
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, NetworkError>;
}
