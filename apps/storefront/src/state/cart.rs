//! # Cart Store
//!
//! The one authoritative cart, shared between the command layer and the
//! payment timer task.
//!
//! ## Single Writer, Many Readers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  commands::cart ──┐                                                     │
//! │                   ├──► CartStore::dispatch(command) ──► Mutex<CartState>│
//! │  payment timer ───┘            │                                        │
//! │                                ▼                                        │
//! │                       watch::Sender<CartState>                          │
//! │                                │                                        │
//! │        ┌───────────────────────┼───────────────────────┐                │
//! │        ▼                       ▼                       ▼                │
//! │   badge reader           snapshot saver          tests / shell          │
//! │                                                                         │
//! │  Readers only ever see whole snapshots; totals can't be stale.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mildar_core::{CartCommand, CartState};
use tokio::sync::watch;
use tracing::debug;

/// Shared handle to the cart. Cloning shares the same cart.
#[derive(Debug, Clone)]
pub struct CartStore {
    cart: Arc<Mutex<CartState>>,
    changes: Arc<watch::Sender<CartState>>,
}

impl CartStore {
    /// Creates a store holding an empty cart.
    pub fn new() -> Self {
        Self::with_state(CartState::new())
    }

    /// Creates a store from a restored cart.
    pub fn with_state(state: CartState) -> Self {
        let (changes, _) = watch::channel(state.clone());
        CartStore {
            cart: Arc::new(Mutex::new(state)),
            changes: Arc::new(changes),
        }
    }

    /// Applies one command and returns the new snapshot.
    ///
    /// This is the only way the cart changes. Subscribers are notified
    /// while the lock is held so notifications arrive in command order.
    pub fn dispatch(&self, command: CartCommand) -> CartState {
        let mut cart = self.lock();
        let next = cart.apply(&command);
        *cart = next.clone();
        self.changes.send_replace(next.clone());
        debug!(
            ?command,
            item_count = next.item_count(),
            total = %next.total(),
            "Cart updated"
        );
        next
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> CartState {
        self.lock().clone()
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartState) -> R,
    {
        f(&self.lock())
    }

    /// Receives every new snapshot after it is dispatched.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.changes.subscribe()
    }

    // Every stored value is a complete state from a pure transition, so a
    // poisoned lock still guards a valid cart.
    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}
