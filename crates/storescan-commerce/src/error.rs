//! Commerce error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{ItemId, StoreIdentifier};
use crate::money::Money;

/// Rejected store identifier input.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierError {
    /// Nothing left after trimming.
    #[error("Please enter a valid Barcode ID.")]
    Empty,
}

/// Errors from resolving an identifier to a catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogError {
    /// No store exists for the identifier.
    #[error("No store found for {0}")]
    NotFound(StoreIdentifier),

    /// Transport or malformed-response failure.
    #[error("Failed to fetch store details: {0}")]
    Network(String),
}

/// Transport or malformed-response failure while creating an order.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("Order request failed: {0}")]
pub struct NetworkError(pub String);

impl NetworkError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Precondition failures caught before any order request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    /// No resolved store identity.
    #[error("Store information is not available")]
    MissingStore,

    /// The cart has no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// A line carries a non-positive quantity.
    #[error("Invalid item quantity in cart: {item} has quantity {quantity}")]
    InvalidQuantity { item: ItemId, quantity: u32 },

    /// The amount to charge is not positive.
    #[error("Invalid order total: {0}")]
    InvalidTotal(Money),
}

/// Unexpected failure while producing the display tree.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("Render fault: {0}")]
pub struct RenderFault(pub String);

impl RenderFault {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Errors that can occur in storescan operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Render(#[from] RenderFault),
}

impl CommerceError {
    /// Whether retrying the same operation can succeed.
    ///
    /// Validation and identifier errors need different input first; render
    /// faults go through the recovery shell.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CommerceError::Catalog(_) | CommerceError::Network(_))
    }
}
