//! Session state and its update function.
//!
//! All state for one resolved identifier lives in [`SessionState`]. Every
//! user action and every network completion is an [`Action`], and
//! [`update`] maps `(old state, action)` to `(new state, effect)` without
//! mutating the old state. Effects are performed by the caller (see
//! [`crate::runtime`]), whose completions come back as actions.

use crate::browse::{CategoryTree, Expansion};
use crate::cart::{CartEngine, CartTotals};
use crate::catalog::{Catalog, CatalogStore, Store};
use crate::checkout::{
    Order, OrderRequest, OrderSubmitter, SubmitFailure, SubmitOutcome, SubmitStep, Ticket,
};
use crate::error::{CatalogError, CommerceError, NetworkError};
use crate::ids::{CategoryId, ItemId, OrderId, StoreIdentifier};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Where catalog resolution stands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum CatalogState {
    /// No identifier resolved yet.
    #[default]
    Unresolved,
    Loading { identifier: StoreIdentifier },
    Ready(CatalogStore),
    /// Fetch failed; Retry / Cancel pending.
    Failed {
        identifier: StoreIdentifier,
        error: CatalogError,
    },
    /// Fetch failed and the user cancelled. Retry is still possible.
    Unavailable {
        identifier: StoreIdentifier,
        error: CatalogError,
    },
}

impl CatalogState {
    pub fn identifier(&self) -> Option<&StoreIdentifier> {
        match self {
            CatalogState::Unresolved => None,
            CatalogState::Loading { identifier }
            | CatalogState::Failed { identifier, .. }
            | CatalogState::Unavailable { identifier, .. } => Some(identifier),
            CatalogState::Ready(store) => Some(store.identifier()),
        }
    }

    pub fn store(&self) -> Option<&CatalogStore> {
        match self {
            CatalogState::Ready(store) => Some(store),
            _ => None,
        }
    }
}

/// A user-facing choice the session is waiting on.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt<'a> {
    CatalogFailed(&'a CatalogError),
    OrderFailed(&'a SubmitFailure),
}

impl Prompt<'_> {
    /// The failure behind the prompt.
    pub fn error(&self) -> CommerceError {
        match self {
            Prompt::CatalogFailed(error) => CommerceError::Catalog((*error).clone()),
            Prompt::OrderFailed(SubmitFailure::Validation(error)) => {
                CommerceError::Validation(error.clone())
            }
            Prompt::OrderFailed(SubmitFailure::Network(error)) => {
                CommerceError::Network(error.clone())
            }
        }
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Notice {
    OrderPlaced { order_id: OrderId, total: Money },
}

/// Something that happened: user input or a network completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Action {
    /// A typed or scanned identifier was submitted.
    Resolve(StoreIdentifier),
    CatalogLoaded {
        identifier: StoreIdentifier,
        result: Result<Catalog, CatalogError>,
    },
    Increment(ItemId),
    Decrement(ItemId),
    ToggleCategory(CategoryId),
    SubmitOrder,
    /// The request sent under `ticket` finished.
    OrderCompleted {
        ticket: Ticket,
        result: Result<Order, NetworkError>,
    },
    /// Re-attempt the operation behind the current prompt.
    Retry,
    /// Dismiss the current prompt.
    Cancel,
    DismissNotice,
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    FetchCatalog(StoreIdentifier),
    CreateOrder { ticket: Ticket, request: OrderRequest },
}

/// Everything the display layer and the order flow need.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SessionState {
    pub catalog: CatalogState,
    pub cart: CartEngine,
    pub expansion: Expansion,
    pub submitter: OrderSubmitter,
    pub notice: Option<Notice>,
    currency: Currency,
}

impl SessionState {
    /// An unresolved session pricing in `currency`.
    pub fn new(currency: Currency) -> Self {
        Self {
            cart: CartEngine::new(currency),
            currency,
            ..Self::default()
        }
    }

    pub fn catalog_store(&self) -> Option<&CatalogStore> {
        self.catalog.store()
    }

    pub fn store(&self) -> Option<&Store> {
        self.catalog_store().map(CatalogStore::store)
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// Category view over the latest catalog and cart.
    pub fn tree(&self) -> Option<CategoryTree<'_>> {
        self.catalog_store()
            .map(|store| CategoryTree::new(store.catalog(), &self.cart, &self.expansion))
    }

    /// The prompt awaiting a Retry / Cancel choice, if any.
    pub fn prompt(&self) -> Option<Prompt<'_>> {
        if let CatalogState::Failed { error, .. } = &self.catalog {
            return Some(Prompt::CatalogFailed(error));
        }
        match self.submitter.phase() {
            crate::checkout::SubmitPhase::Failed { failure, .. } => {
                Some(Prompt::OrderFailed(failure))
            }
            _ => None,
        }
    }

    /// Whether a request is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self.catalog, CatalogState::Loading { .. }) || self.submitter.is_in_flight()
    }

    fn with_cart(&self, cart: CartEngine) -> Self {
        let catalog = match &self.catalog {
            CatalogState::Ready(store) => CatalogState::Ready(sync_display(store, &cart)),
            other => other.clone(),
        };
        Self {
            catalog,
            cart,
            ..self.clone()
        }
    }
}

/// Mirror cart quantities onto the catalog items' display field.
fn sync_display(store: &CatalogStore, cart: &CartEngine) -> CatalogStore {
    store
        .catalog()
        .items
        .iter()
        .filter(|item| item.display_quantity != cart.quantity_of(&item.id))
        .fold(store.clone(), |acc, item| {
            acc.with_display_quantity(&item.id, cart.quantity_of(&item.id))
        })
}

/// Compute the next state for an action.
pub fn update(state: &SessionState, action: Action) -> (SessionState, Effect) {
    tracing::debug!(?action, "session update");
    match action {
        Action::Resolve(identifier) => {
            let next = SessionState {
                catalog: CatalogState::Loading {
                    identifier: identifier.clone(),
                },
                notice: None,
                submitter: state.submitter.reset(),
                ..SessionState::new(state.currency)
            };
            (next, Effect::FetchCatalog(identifier))
        }

        Action::CatalogLoaded { identifier, result } => {
            let CatalogState::Loading { identifier: current } = &state.catalog else {
                tracing::warn!(identifier = %identifier, "catalog arrived while not loading");
                return (state.clone(), Effect::None);
            };
            if current != &identifier {
                tracing::warn!(identifier = %identifier, "dropping catalog for a stale identifier");
                return (state.clone(), Effect::None);
            }
            let next = match result {
                Ok(catalog) => SessionState {
                    cart: CartEngine::new(catalog.currency),
                    currency: catalog.currency,
                    catalog: CatalogState::Ready(CatalogStore::new(identifier, catalog)),
                    ..state.clone()
                },
                Err(error) => SessionState {
                    catalog: CatalogState::Failed { identifier, error },
                    ..state.clone()
                },
            };
            (next, Effect::None)
        }

        Action::Increment(item_id) => {
            let Some(item) = state
                .catalog_store()
                .and_then(|store| store.catalog().item(&item_id))
            else {
                tracing::warn!(item = %item_id, "increment for an item not in the catalog");
                return (state.clone(), Effect::None);
            };
            (state.with_cart(state.cart.increment(item)), Effect::None)
        }

        Action::Decrement(item_id) => {
            if state.catalog_store().is_none() {
                return (state.clone(), Effect::None);
            }
            (state.with_cart(state.cart.decrement(&item_id)), Effect::None)
        }

        Action::ToggleCategory(category_id) => {
            let next = SessionState {
                expansion: state.expansion.toggle(&category_id),
                ..state.clone()
            };
            (next, Effect::None)
        }

        Action::SubmitOrder => {
            let (submitter, step) = state.submitter.begin(state.store(), &state.cart);
            submit_step(state, submitter, step)
        }

        Action::OrderCompleted { ticket, result } => {
            let (submitter, outcome) = state.submitter.complete(ticket, result);
            match outcome {
                SubmitOutcome::Succeeded(order) => {
                    let cleared = SessionState {
                        submitter,
                        notice: Some(Notice::OrderPlaced {
                            order_id: order.id,
                            total: order.total,
                        }),
                        ..state.with_cart(state.cart.cleared())
                    };
                    (cleared, Effect::None)
                }
                SubmitOutcome::Failed(_) | SubmitOutcome::Stale => (
                    SessionState {
                        submitter,
                        ..state.clone()
                    },
                    Effect::None,
                ),
            }
        }

        Action::Retry => match &state.catalog {
            CatalogState::Failed { identifier, .. } | CatalogState::Unavailable { identifier, .. } => {
                let next = SessionState {
                    catalog: CatalogState::Loading {
                        identifier: identifier.clone(),
                    },
                    ..state.clone()
                };
                (next, Effect::FetchCatalog(identifier.clone()))
            }
            _ => {
                let (submitter, step) = state.submitter.retry(state.store(), &state.cart);
                submit_step(state, submitter, step)
            }
        },

        Action::Cancel => {
            let catalog = match &state.catalog {
                CatalogState::Failed { identifier, error } => CatalogState::Unavailable {
                    identifier: identifier.clone(),
                    error: error.clone(),
                },
                other => other.clone(),
            };
            let next = SessionState {
                catalog,
                submitter: state.submitter.cancel(),
                ..state.clone()
            };
            (next, Effect::None)
        }

        Action::DismissNotice => (
            SessionState {
                notice: None,
                ..state.clone()
            },
            Effect::None,
        ),
    }
}

fn submit_step(
    state: &SessionState,
    submitter: OrderSubmitter,
    step: SubmitStep,
) -> (SessionState, Effect) {
    let effect = match step {
        SubmitStep::Send { ticket, request } => Effect::CreateOrder { ticket, request },
        SubmitStep::Ignored | SubmitStep::Rejected(_) => Effect::None,
    };
    (
        SessionState {
            submitter,
            ..state.clone()
        },
        effect,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{OrderStatus, SubmitPhase};
    use crate::error::ValidationError;
    use crate::test_support::sample_catalog;

    fn ready() -> SessionState {
        let (state, _) = update(
            &SessionState::new(Currency::INR),
            Action::Resolve(StoreIdentifier::new("8901")),
        );
        let (state, effect) = update(
            &state,
            Action::CatalogLoaded {
                identifier: StoreIdentifier::new("8901"),
                result: Ok(sample_catalog()),
            },
        );
        assert_eq!(effect, Effect::None);
        state
    }

    fn apply(state: SessionState, actions: Vec<Action>) -> SessionState {
        actions
            .into_iter()
            .fold(state, |acc, action| update(&acc, action).0)
    }

    fn milk() -> ItemId {
        ItemId::new("milk")
    }

    /// Failed completion for the order `effect` sent.
    fn failed(effect: &Effect, reason: &str) -> Action {
        let Effect::CreateOrder { ticket, .. } = effect else {
            panic!("expected order request, got {:?}", effect);
        };
        Action::OrderCompleted {
            ticket: *ticket,
            result: Err(NetworkError::new(reason)),
        }
    }

    fn load(state: &SessionState, identifier: &str) -> SessionState {
        let (state, _) = update(state, Action::Resolve(StoreIdentifier::new(identifier)));
        let (state, _) = update(
            &state,
            Action::CatalogLoaded {
                identifier: StoreIdentifier::new(identifier),
                result: Ok(sample_catalog()),
            },
        );
        state
    }

    #[test]
    fn test_resolve_requests_fetch() {
        let (state, effect) = update(
            &SessionState::new(Currency::INR),
            Action::Resolve(StoreIdentifier::new("8901")),
        );
        assert_eq!(effect, Effect::FetchCatalog(StoreIdentifier::new("8901")));
        assert!(state.is_busy());
    }

    #[test]
    fn test_increment_updates_cart_and_display_quantity() {
        let state = apply(ready(), vec![Action::Increment(milk()), Action::Increment(milk())]);
        assert_eq!(state.cart.quantity_of(&milk()), 2);
        let item = state.catalog_store().unwrap().catalog().item(&milk()).unwrap();
        assert_eq!(item.display_quantity, 2);

        let state = apply(state, vec![Action::Decrement(milk()), Action::Decrement(milk())]);
        assert!(state.cart.is_empty());
        let item = state.catalog_store().unwrap().catalog().item(&milk()).unwrap();
        assert_eq!(item.display_quantity, 0);
    }

    #[test]
    fn test_update_leaves_prior_state_untouched() {
        let before = ready();
        let (after, _) = update(&before, Action::Increment(milk()));
        assert!(before.cart.is_empty());
        assert_eq!(after.cart.line_count(), 1);
    }

    #[test]
    fn test_increment_unknown_item_is_ignored() {
        let state = ready();
        let (next, _) = update(&state, Action::Increment(ItemId::new("nope")));
        assert_eq!(next, state);
    }

    #[test]
    fn test_cart_actions_before_catalog_are_ignored() {
        let state = SessionState::new(Currency::INR);
        let next = apply(state.clone(), vec![Action::Increment(milk()), Action::Decrement(milk())]);
        assert_eq!(next, state);
    }

    #[test]
    fn test_stale_catalog_is_dropped() {
        let (state, _) = update(
            &SessionState::new(Currency::INR),
            Action::Resolve(StoreIdentifier::new("new")),
        );
        let (next, _) = update(
            &state,
            Action::CatalogLoaded {
                identifier: StoreIdentifier::new("old"),
                result: Ok(sample_catalog()),
            },
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_catalog_failure_prompts_and_retry_refetches() {
        let (state, _) = update(
            &SessionState::new(Currency::INR),
            Action::Resolve(StoreIdentifier::new("8901")),
        );
        let (state, _) = update(
            &state,
            Action::CatalogLoaded {
                identifier: StoreIdentifier::new("8901"),
                result: Err(CatalogError::Network("offline".into())),
            },
        );
        assert!(matches!(state.prompt(), Some(Prompt::CatalogFailed(_))));

        let (retried, effect) = update(&state, Action::Retry);
        assert_eq!(effect, Effect::FetchCatalog(StoreIdentifier::new("8901")));
        assert!(retried.is_busy());

        let (cancelled, effect) = update(&state, Action::Cancel);
        assert_eq!(effect, Effect::None);
        assert!(cancelled.prompt().is_none());
        assert!(matches!(cancelled.catalog, CatalogState::Unavailable { .. }));
    }

    #[test]
    fn test_toggle_category() {
        let dairy = CategoryId::new("dairy");
        let state = apply(ready(), vec![Action::ToggleCategory(dairy.clone())]);
        assert!(state.expansion.is_expanded(&dairy));
        let state = apply(state, vec![Action::ToggleCategory(dairy.clone())]);
        assert_eq!(state.expansion.expanded(), None);
    }

    #[test]
    fn test_double_submit_yields_one_request() {
        let state = apply(ready(), vec![Action::Increment(milk())]);
        let (state, first) = update(&state, Action::SubmitOrder);
        assert!(matches!(first, Effect::CreateOrder { .. }));
        let (state, second) = update(&state, Action::SubmitOrder);
        assert_eq!(second, Effect::None);
        assert!(state.submitter.is_in_flight());
    }

    #[test]
    fn test_success_clears_cart_and_notifies() {
        let state = apply(ready(), vec![Action::Increment(milk()), Action::Increment(milk())]);
        let (state, effect) = update(&state, Action::SubmitOrder);
        let Effect::CreateOrder { ticket, request } = effect else {
            panic!("expected order request");
        };
        let order = Order::from_request(OrderId::new("o-1"), &request, OrderStatus::Pending);
        let (state, _) = update(
            &state,
            Action::OrderCompleted {
                ticket,
                result: Ok(order),
            },
        );

        assert!(state.cart.is_empty());
        assert!(state.totals().is_zero());
        assert_eq!(state.submitter.phase(), &SubmitPhase::Idle);
        assert!(matches!(state.notice, Some(Notice::OrderPlaced { .. })));
        let item = state.catalog_store().unwrap().catalog().item(&milk()).unwrap();
        assert_eq!(item.display_quantity, 0);
    }

    #[test]
    fn test_failure_then_cancel_keeps_cart() {
        let state = apply(ready(), vec![Action::Increment(milk())]);
        let (state, effect) = update(&state, Action::SubmitOrder);
        let (state, _) = update(&state, failed(&effect, "503 Service Unavailable"));
        assert!(matches!(state.prompt(), Some(Prompt::OrderFailed(_))));

        let (cancelled, effect) = update(&state, Action::Cancel);
        assert_eq!(effect, Effect::None);
        assert_eq!(cancelled.cart, state.cart);
        assert!(cancelled.prompt().is_none());
    }

    #[test]
    fn test_failure_then_retry_resends_stale_payload() {
        let state = apply(ready(), vec![Action::Increment(milk())]);
        let (state, effect) = update(&state, Action::SubmitOrder);
        let Effect::CreateOrder {
            request: original, ..
        } = &effect
        else {
            panic!("expected order request");
        };
        let state = apply(
            state,
            vec![failed(&effect, "reset"), Action::Increment(milk())],
        );
        let (_, retried) = update(&state, Action::Retry);
        let Effect::CreateOrder { request, .. } = retried else {
            panic!("expected a resend");
        };
        assert_eq!(&request, original);
    }

    #[test]
    fn test_empty_cart_submit_is_rejected_without_request() {
        let (state, effect) = update(&ready(), Action::SubmitOrder);
        assert_eq!(effect, Effect::None);
        assert_eq!(
            state.prompt(),
            Some(Prompt::OrderFailed(&SubmitFailure::Validation(
                ValidationError::EmptyCart
            )))
        );
    }

    #[test]
    fn test_prompt_error_classifies_failures() {
        let (empty, _) = update(&ready(), Action::SubmitOrder);
        let error = empty.prompt().unwrap().error();
        assert_eq!(error, CommerceError::Validation(ValidationError::EmptyCart));
        assert!(!error.is_retryable());

        let state = apply(ready(), vec![Action::Increment(milk())]);
        let (state, effect) = update(&state, Action::SubmitOrder);
        let (state, _) = update(&state, failed(&effect, "timeout"));
        let error = state.prompt().unwrap().error();
        assert_eq!(error, CommerceError::Network(NetworkError::new("timeout")));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_resolve_discards_previous_cart() {
        let state = apply(ready(), vec![Action::Increment(milk())]);
        let (state, _) = update(&state, Action::Resolve(StoreIdentifier::new("other")));
        assert!(state.cart.is_empty());
        assert!(state.catalog_store().is_none());
    }

    #[test]
    fn test_completion_from_previous_store_is_dropped() {
        let state = apply(
            load(&SessionState::new(Currency::INR), "store-a"),
            vec![Action::Increment(milk())],
        );
        let (state, order_a) = update(&state, Action::SubmitOrder);

        let state = apply(load(&state, "store-b"), vec![Action::Increment(milk())]);
        let (state, order_b) = update(&state, Action::SubmitOrder);
        assert!(matches!(order_b, Effect::CreateOrder { .. }));
        assert_ne!(order_a, order_b);

        // Store A's request fails late; store B's request is still in flight.
        let (state, effect) = update(&state, failed(&order_a, "A failed"));
        assert_eq!(effect, Effect::None);
        assert!(state.prompt().is_none());
        assert!(state.submitter.is_in_flight());

        let (state, effect) = update(&state, Action::Retry);
        assert_eq!(effect, Effect::None);
        let (state, effect) = update(&state, Action::SubmitOrder);
        assert_eq!(effect, Effect::None);

        // A late success for A does not clear B's cart either.
        let Effect::CreateOrder { ticket, request } = &order_a else {
            unreachable!();
        };
        let order = Order::from_request(OrderId::new("order-a"), request, OrderStatus::Pending);
        let (state, _) = update(
            &state,
            Action::OrderCompleted {
                ticket: *ticket,
                result: Ok(order),
            },
        );
        assert_eq!(state.cart.quantity_of(&milk()), 1);
        assert!(state.notice.is_none());

        // B's own failure still prompts, and Retry resends B.
        let (state, _) = update(&state, failed(&order_b, "B failed"));
        assert!(matches!(state.prompt(), Some(Prompt::OrderFailed(_))));
        let (_, effect) = update(&state, Action::Retry);
        assert!(matches!(effect, Effect::CreateOrder { .. }));
    }

    #[test]
    fn test_state_serializes() {
        let state = apply(ready(), vec![Action::Increment(milk())]);
        let json = serde_json::to_string(&state).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
