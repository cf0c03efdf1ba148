//! REST backend for the commerce core.
//!
//! ```text
//! GET  /stores/{identifier}  -> { store, categories, items }
//! POST /orders               -> created order
//! ```
//!
//! Prices travel as decimal amounts in major units and are converted to
//! [`Money`] at this boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storescan_commerce::catalog::{Catalog, Category, Item, Store};
use storescan_commerce::checkout::{Order, OrderRequest, OrderStatus};
use storescan_commerce::{
    CatalogError, Currency, Money, NetworkError, OrderId, StoreApi, StoreIdentifier,
};

use crate::{ClientRequestBuilder, FetchClient, FetchError, Response};

/// Placeholder customer number sent when none is configured.
pub const DEFAULT_MOBILE: &str = "9672281491";

#[derive(Debug, Deserialize)]
struct WireStore {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireCategory {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireItem {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    name: String,
    category: String,
    mrp: f64,
    #[serde(default)]
    discount: f64,
}

#[derive(Debug, Deserialize)]
struct WireCatalog {
    #[serde(default)]
    store: Option<WireStore>,
    #[serde(default)]
    categories: Vec<WireCategory>,
    #[serde(default)]
    items: Vec<WireItem>,
}

/// One line of an order body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrderLine {
    pub item: String,
    pub quantity: u32,
    pub price: f64,
    pub discount: f64,
    pub discounted_price: f64,
}

/// The `POST /orders` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireOrder {
    pub items: Vec<WireOrderLine>,
    pub mobile: String,
    pub store: String,
    pub total: f64,
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct WireCreatedOrder {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    status: Option<String>,
}

/// Decode a `GET /stores/{identifier}` response.
///
/// A 404 or a payload without a `store` object means the identifier does
/// not resolve; every other failure is a network error.
pub fn decode_catalog(
    response: &Response,
    identifier: &StoreIdentifier,
    currency: Currency,
) -> Result<Catalog, CatalogError> {
    if response.is_not_found() {
        return Err(CatalogError::NotFound(identifier.clone()));
    }
    if let Err(e) = response.clone().error_for_status() {
        return Err(CatalogError::Network(e.to_string()));
    }
    if response.is_empty() {
        return Err(CatalogError::NotFound(identifier.clone()));
    }

    let wire: WireCatalog = response
        .json()
        .map_err(|e| CatalogError::Network(e.to_string()))?;
    let Some(store) = wire.store else {
        return Err(CatalogError::NotFound(identifier.clone()));
    };

    let categories = wire
        .categories
        .into_iter()
        .map(|c| Category::new(c.id, c.name))
        .collect();
    let items = wire
        .items
        .into_iter()
        .map(|i| {
            Item::new(i.id, i.name, i.category, Money::from_decimal(i.mrp, currency))
                .with_discount(i.discount)
        })
        .collect();

    Ok(Catalog::new(Store::new(store.id, store.name), categories, items).with_currency(currency))
}

/// Build the `POST /orders` body for a validated request.
pub fn encode_order(request: &OrderRequest, mobile: &str) -> WireOrder {
    WireOrder {
        items: request
            .lines
            .iter()
            .map(|line| WireOrderLine {
                item: line.item_id.to_string(),
                quantity: line.quantity,
                price: line.price.to_decimal(),
                discount: line.discount_percent,
                discounted_price: line.discounted_price.to_decimal(),
            })
            .collect(),
        mobile: mobile.to_string(),
        store: request.store_id.to_string(),
        total: request.total.to_decimal(),
        status: request.status.as_str().to_string(),
    }
}

/// Decode a `POST /orders` response into the created order.
pub fn decode_order(response: &Response, request: &OrderRequest) -> Result<Order, NetworkError> {
    let response = response
        .clone()
        .error_for_status()
        .map_err(|e| NetworkError::new(e.to_string()))?;
    if response.is_empty() {
        return Err(NetworkError::new("Failed to create order"));
    }
    let created: WireCreatedOrder = response
        .json()
        .map_err(|e| NetworkError::new(e.to_string()))?;
    let status = created
        .status
        .as_deref()
        .and_then(OrderStatus::from_str)
        .unwrap_or(request.status);
    Ok(Order::from_request(OrderId::new(created.id), request, status))
}

/// [`StoreApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStoreApi {
    client: FetchClient,
    mobile: String,
    currency: Currency,
}

impl HttpStoreApi {
    pub fn new(client: FetchClient) -> Self {
        Self {
            client,
            mobile: DEFAULT_MOBILE.to_string(),
            currency: Currency::default(),
        }
    }

    /// Customer number attached to every order.
    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = mobile.into();
        self
    }

    /// Currency the backend's decimal prices are expressed in.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }

    fn store_request(&self, identifier: &StoreIdentifier) -> ClientRequestBuilder<'_> {
        self.client
            .get(format!("/stores/{}", identifier))
            .accept("application/json")
    }
}

#[async_trait]
impl StoreApi for HttpStoreApi {
    async fn fetch_store(&self, identifier: &StoreIdentifier) -> Result<Catalog, CatalogError> {
        let response = self
            .store_request(identifier)
            .send()
            .await
            .map_err(|e: FetchError| CatalogError::Network(e.to_string()))?;
        decode_catalog(&response, identifier, self.currency)
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<Order, NetworkError> {
        let body = encode_order(request, &self.mobile);
        let response = self
            .client
            .post("/orders")
            .json(&body)
            .map_err(|e| NetworkError::new(e.to_string()))?
            .send()
            .await
            .map_err(|e| NetworkError::new(e.to_string()))?;
        let order = decode_order(&response, request)?;
        tracing::info!(order = %order.id, status = order.status.as_str(), "order created");
        Ok(order)
    }
}
