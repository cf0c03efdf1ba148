//! Store catalog, cart and order logic for storescan.
//!
//! A typed or scanned identifier resolves to a store catalog; the user
//! builds a cart against it and places an order:
//!
//! - **Catalog**: the read-only store, categories and items for one identifier
//! - **Cart**: per-item quantities with price snapshots and derived totals
//! - **Browse**: category grouping with a single expanded category
//! - **Checkout**: validation and single-flight order submission with retry
//! - **Recovery**: a fault boundary around view rendering
//! - **Session**: the explicit state threaded through `update`
//! - **Runtime**: the cooperative event loop that performs effects
//!
//! # Example
//!
//! ```rust,ignore
//! use storescan_commerce::prelude::*;
//!
//! let (state, effect) = update(
//!     &SessionState::new(Currency::INR),
//!     Action::Resolve(StoreIdentifier::parse("8901234567890")?),
//! );
//! // The caller performs `effect` (here a catalog fetch) and feeds the
//! // completion back in as `Action::CatalogLoaded`.
//! ```

pub mod api;
pub mod error;
pub mod ids;
pub mod money;

pub mod browse;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod recovery;
pub mod runtime;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::StoreApi;
pub use error::{
    CatalogError, CommerceError, IdentifierError, NetworkError, RenderFault, ValidationError,
};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::api::StoreApi;
    pub use crate::error::{
        CatalogError, CommerceError, IdentifierError, NetworkError, RenderFault, ValidationError,
    };
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, CatalogStore, Category, Item, Store};

    // Cart
    pub use crate::cart::{CartEngine, CartLine, CartTotals, LineTotals};

    // Browse
    pub use crate::browse::{CategoryGroup, CategoryTree, Expansion, ItemView};

    // Checkout
    pub use crate::checkout::{
        Order, OrderRequest, OrderStatus, OrderSubmitter, SubmitFailure, SubmitOutcome,
        SubmitPhase, SubmitStep, Ticket,
    };

    // Recovery
    pub use crate::recovery::{Frame, RecoveryShell};

    // Session
    pub use crate::runtime::{execute, EventLoop};
    pub use crate::session::{update, Action, CatalogState, Effect, Notice, Prompt, SessionState};
}
