//! Checkout module.
//!
//! Contains order types and the single-flight order submitter.

mod order;
mod submitter;

pub use order::{Order, OrderRequest, OrderStatus};
pub use submitter::{
    OrderSubmitter, SubmitFailure, SubmitOutcome, SubmitPhase, SubmitStep, Ticket,
};
