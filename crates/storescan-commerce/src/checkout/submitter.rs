//! Order submission state machine.
//!
//! ```text
//! Idle -> (validate) -> Submitting -> Idle            on success, cart cleared
//!                                  -> Failed -> Submitting   Retry, same payload
//!                                            -> Idle         Cancel
//! ```
//!
//! Validation runs synchronously inside [`OrderSubmitter::begin`], so no
//! other event can observe a half-validated submission.
//!
//! Every request that goes out carries a fresh [`Ticket`]. A completion is
//! only applied when its ticket matches the one in flight.

use crate::cart::CartEngine;
use crate::catalog::Store;
use crate::checkout::{Order, OrderRequest, OrderStatus};
use crate::error::{NetworkError, ValidationError};
use serde::{Deserialize, Serialize};

/// Why the last submission did not go through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
pub enum SubmitFailure {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Correlates one sent request with its completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Ticket(pub u64);

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Submission phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum SubmitPhase {
    /// No submission outstanding.
    #[default]
    Idle,
    /// A request is in flight.
    Submitting {
        request: OrderRequest,
        attempt: u32,
        ticket: Ticket,
    },
    /// The last attempt failed; waiting for Retry or Cancel.
    ///
    /// `request` is the validated payload, absent when validation itself
    /// failed.
    Failed {
        request: Option<OrderRequest>,
        attempt: u32,
        failure: SubmitFailure,
    },
}

/// What the caller should do after asking to submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStep {
    /// A submission is already in flight; nothing happens.
    Ignored,
    /// Validation failed before any request.
    Rejected(ValidationError),
    /// Send exactly this request, tagged with `ticket`.
    Send { ticket: Ticket, request: OrderRequest },
}

/// Result of feeding a request completion back into the submitter.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Succeeded(Order),
    Failed(NetworkError),
    /// Not the request in flight; the completion is dropped.
    Stale,
}

/// Validates carts and guards order submission with an in-flight flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OrderSubmitter {
    phase: SubmitPhase,
    /// Last ticket handed out. Never rewinds, not even on [`reset`](Self::reset).
    #[serde(default)]
    issued: u64,
}

impl OrderSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    /// Ticket of the request in flight.
    pub fn in_flight_ticket(&self) -> Option<Ticket> {
        match self.phase {
            SubmitPhase::Submitting { ticket, .. } => Some(ticket),
            _ => None,
        }
    }

    /// Whether a request is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, SubmitPhase::Submitting { .. })
    }

    /// Whether a Retry / Cancel choice is pending.
    pub fn awaiting_choice(&self) -> bool {
        matches!(self.phase, SubmitPhase::Failed { .. })
    }

    /// Check submission preconditions and capture the payload.
    ///
    /// Checks run in order: store, emptiness, line quantities, total.
    pub fn validate(
        store: Option<&Store>,
        cart: &CartEngine,
    ) -> Result<OrderRequest, ValidationError> {
        let store = store.ok_or(ValidationError::MissingStore)?;
        if cart.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        if let Some(line) = cart.lines().iter().find(|l| l.quantity == 0) {
            return Err(ValidationError::InvalidQuantity {
                item: line.item_id.clone(),
                quantity: line.quantity,
            });
        }
        let total = cart.totals().discounted_total;
        if !total.is_positive() {
            return Err(ValidationError::InvalidTotal(total));
        }
        Ok(OrderRequest {
            lines: cart.lines().to_vec(),
            store_id: store.id.clone(),
            total,
            status: OrderStatus::Pending,
        })
    }

    /// Ask to submit the current cart.
    ///
    /// While a request is in flight this is silently ignored.
    pub fn begin(&self, store: Option<&Store>, cart: &CartEngine) -> (Self, SubmitStep) {
        if self.is_in_flight() {
            tracing::debug!("order submission already in flight, ignoring");
            return (self.clone(), SubmitStep::Ignored);
        }
        match Self::validate(store, cart) {
            Ok(request) => {
                tracing::info!(
                    store = %request.store_id,
                    lines = request.lines.len(),
                    total = %request.total,
                    "submitting order"
                );
                self.submitting(request, 1)
            }
            Err(e) => {
                tracing::warn!(error = %e, "order validation failed");
                let next = self.with_phase(SubmitPhase::Failed {
                    request: None,
                    attempt: 0,
                    failure: e.clone().into(),
                });
                (next, SubmitStep::Rejected(e))
            }
        }
    }

    /// Feed the result of the request sent under `ticket` back in.
    ///
    /// Anything other than the request in flight is [`SubmitOutcome::Stale`].
    pub fn complete(
        &self,
        ticket: Ticket,
        result: Result<Order, NetworkError>,
    ) -> (Self, SubmitOutcome) {
        let SubmitPhase::Submitting {
            request,
            attempt,
            ticket: current,
        } = &self.phase
        else {
            tracing::warn!(%ticket, "order completion arrived with nothing in flight");
            return (self.clone(), SubmitOutcome::Stale);
        };
        if *current != ticket {
            tracing::warn!(
                %ticket,
                in_flight = %current,
                "dropping completion for another submission"
            );
            return (self.clone(), SubmitOutcome::Stale);
        }
        match result {
            Ok(order) => {
                tracing::info!(order = %order.id, attempt, %ticket, "order placed");
                (self.with_phase(SubmitPhase::Idle), SubmitOutcome::Succeeded(order))
            }
            Err(e) => {
                tracing::warn!(error = %e, attempt, %ticket, "order submission failed");
                let next = self.with_phase(SubmitPhase::Failed {
                    request: Some(request.clone()),
                    attempt: *attempt,
                    failure: e.clone().into(),
                });
                (next, SubmitOutcome::Failed(e))
            }
        }
    }

    /// Retry after a failure.
    ///
    /// A network failure resends the already-validated payload without
    /// reading the cart or catalog again. A validation failure has no
    /// payload, so it validates the current cart afresh.
    pub fn retry(&self, store: Option<&Store>, cart: &CartEngine) -> (Self, SubmitStep) {
        match &self.phase {
            SubmitPhase::Failed {
                request: Some(request),
                attempt,
                ..
            } => {
                tracing::info!(attempt = attempt + 1, "retrying order submission");
                self.submitting(request.clone(), attempt + 1)
            }
            SubmitPhase::Failed { request: None, .. } => {
                self.with_phase(SubmitPhase::Idle).begin(store, cart)
            }
            _ => (self.clone(), SubmitStep::Ignored),
        }
    }

    /// Dismiss a failure, leaving everything else untouched.
    pub fn cancel(&self) -> Self {
        match self.phase {
            SubmitPhase::Failed { .. } => self.with_phase(SubmitPhase::Idle),
            _ => self.clone(),
        }
    }

    /// Forget the current submission for a new store.
    ///
    /// A request still in flight is abandoned; its completion will be stale.
    pub fn reset(&self) -> Self {
        if let Some(ticket) = self.in_flight_ticket() {
            tracing::debug!(%ticket, "abandoning in-flight order");
        }
        self.with_phase(SubmitPhase::Idle)
    }

    fn submitting(&self, request: OrderRequest, attempt: u32) -> (Self, SubmitStep) {
        let ticket = Ticket(self.issued + 1);
        let next = Self {
            phase: SubmitPhase::Submitting {
                request: request.clone(),
                attempt,
                ticket,
            },
            issued: ticket.0,
        };
        (next, SubmitStep::Send { ticket, request })
    }

    fn with_phase(&self, phase: SubmitPhase) -> Self {
        Self {
            phase,
            issued: self.issued,
        }
    }
}
