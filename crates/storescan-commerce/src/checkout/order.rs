//! Order types.

use crate::cart::{CartLine, CartTotals};
use crate::ids::{OrderId, StoreId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order accepted by the store.
    Confirmed,
    /// Order completed and handed over.
    Completed,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" | "canceled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// A validated order payload, ready to send.
///
/// Captured once at validation time; a retry resends this exact value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    /// Snapshot of the cart lines.
    pub lines: Vec<CartLine>,
    /// Store the order is placed with.
    pub store_id: StoreId,
    /// Discounted total, the amount charged.
    pub total: Money,
    /// Status at creation.
    pub status: OrderStatus,
}

impl OrderRequest {
    /// Totals recomputed from the captured lines.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from_lines(&self.lines, self.total.currency)
    }

    pub fn currency(&self) -> Currency {
        self.total.currency
    }
}

/// An order created by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    pub lines: Vec<CartLine>,
    pub total: Money,
    pub status: OrderStatus,
}

impl Order {
    /// Build the created order from the request that produced it.
    pub fn from_request(id: OrderId, request: &OrderRequest, status: OrderStatus) -> Self {
        Self {
            id,
            store_id: request.store_id.clone(),
            lines: request.lines.clone(),
            total: request.total,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_wire_names() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_str("canceled"), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::from_str("lost"), None);
    }

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
