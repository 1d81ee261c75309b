use crate::{IdentityStateStore, Navigator, Route};

use sf_core::AuthSnapshot;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;

/// States of the privileged-area boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Waiting for the identity store to finish its first resolution
    Initializing,
    /// Decision made: not an authenticated admin, redirect issued
    Redirecting,
    /// Decision made: authenticated admin, protected content may render
    Authorized,
}

/// Authorization boundary for privileged routes.
///
/// Waits out the store's initial loading state before deciding (deciding on
/// the default state would flash a redirect on every load), then evaluates
/// exactly once and keeps the decision for its lifetime - a profile retry
/// after the first check can never cause a redirect loop. A role mismatch is
/// handled identically to "not authenticated": redirect to the privileged
/// login, never render the protected region.
pub struct AdminGate {
    store: IdentityStateStore,
    navigator: Arc<dyn Navigator>,
    evaluated: AtomicBool,
    state: RwLock<GateState>,
}

impl AdminGate {
    pub fn new(store: IdentityStateStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            evaluated: AtomicBool::new(false),
            state: RwLock::new(GateState::Initializing),
        }
    }

    /// Current gate state without evaluating.
    pub async fn state(&self) -> GateState {
        *self.state.read().await
    }

    /// Resolve the gate decision, evaluating at most once. The redirect, if
    /// any, fires on the first call only.
    pub async fn resolve(&self) -> GateState {
        let snapshot = self.settled_snapshot().await;

        // Hold the write lock across the swap so concurrent callers observe
        // the decision, not the Initializing default.
        let mut state = self.state.write().await;
        if self.evaluated.swap(true, Ordering::SeqCst) {
            return *state;
        }

        let decision = if snapshot.is_admin() {
            log::debug!("admin gate authorized user {:?}", snapshot.user.as_ref().map(|u| u.id));
            GateState::Authorized
        } else {
            log::info!("privileged area access denied, redirecting to admin login");
            self.navigator.navigate(Route::AdminLogin);
            GateState::Redirecting
        };

        *state = decision;
        decision
    }

    /// Wait until the store has finished its first resolution.
    async fn settled_snapshot(&self) -> AuthSnapshot {
        // Subscribe before sampling so a resolution landing in between
        // cannot be missed.
        let mut changes = self.store.subscribe();

        loop {
            let snapshot = self.store.snapshot().await;
            if !snapshot.is_loading {
                return snapshot;
            }

            match changes.recv().await {
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => return self.store.snapshot().await,
            }
        }
    }
}
