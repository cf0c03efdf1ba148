//! Cooperative event loop driving a session.
//!
//! User actions and network completions are handled one at a time on a
//! single task. Outstanding requests are polled from a `FuturesUnordered`
//! set, so the loop keeps accepting actions while they are in flight.
//! Requests have no timeout and cannot be aborted; a late completion is
//! handled by [`update`] like any other action, and dropped there when its
//! ticket is no longer the one in flight.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{FusedStream, FuturesUnordered};
use futures::{FutureExt, StreamExt};

use crate::api::StoreApi;
use crate::session::{update, Action, Effect, SessionState};

/// Perform an effect and turn its completion into an action.
pub async fn execute(api: &dyn StoreApi, effect: Effect) -> Option<Action> {
    match effect {
        Effect::None => None,
        Effect::FetchCatalog(identifier) => {
            let result = api.fetch_store(&identifier).await;
            Some(Action::CatalogLoaded { identifier, result })
        }
        Effect::CreateOrder { ticket, request } => {
            let result = api.create_order(&request).await;
            Some(Action::OrderCompleted { ticket, result })
        }
    }
}

/// Owns a session and the requests it has issued.
pub struct EventLoop {
    api: Arc<dyn StoreApi>,
    state: SessionState,
    pending: FuturesUnordered<BoxFuture<'static, Option<Action>>>,
}

impl EventLoop {
    pub fn new(api: Arc<dyn StoreApi>, state: SessionState) -> Self {
        Self {
            api,
            state,
            pending: FuturesUnordered::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Number of requests still outstanding.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Apply one action and schedule its effect.
    pub fn dispatch(&mut self, action: Action) {
        let (next, effect) = update(&self.state, action);
        self.state = next;
        if effect != Effect::None {
            let api = Arc::clone(&self.api);
            self.pending
                .push(async move { execute(api.as_ref(), effect).await }.boxed());
        }
    }

    /// Wait for the next outstanding request and apply its completion.
    ///
    /// Returns `false` when nothing is outstanding.
    pub async fn settle_one(&mut self) -> bool {
        match self.pending.next().await {
            Some(Some(action)) => {
                self.dispatch(action);
                true
            }
            Some(None) => true,
            None => false,
        }
    }

    /// Drain all outstanding requests, including ones their completions
    /// schedule.
    pub async fn settle(&mut self) {
        while self.settle_one().await {}
    }

    /// Process actions from `actions` until it ends and every request has
    /// completed, then return the final state.
    pub async fn run<S>(mut self, mut actions: S) -> SessionState
    where
        S: FusedStream<Item = Action> + Unpin,
    {
        loop {
            let next = futures::select! {
                action = actions.next() => action,
                completion = self.pending.select_next_some() => completion,
                complete => break,
            };
            if let Some(action) = next {
                self.dispatch(action);
            }
        }
        self.state
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("state", &self.state)
            .field("in_flight", &self.pending.len())
            .finish()
    }
}
