//! # Cart
//!
//! The cart state and the four commands that change it.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Commands                                        │
//! │                                                                         │
//! │  Page Action              Command                 State Change          │
//! │  ───────────              ───────                 ────────────          │
//! │                                                                         │
//! │  "Add to Cart" ─────────► AddItem(item) ────────► qty += 1 or push     │
//! │                                                                         │
//! │  [+] / [-] buttons ─────► UpdateQuantity(id, n) ► qty = n (n ≤ 0: drop)│
//! │                                                                         │
//! │  Trash icon ────────────► RemoveItem(id) ───────► retain(id != ...)    │
//! │                                                                         │
//! │  Payment done ──────────► ClearCart ────────────► items = []           │
//! │                                                                         │
//! │  After EVERY command: item_count and total are recomputed from items.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command is total: unknown ids are no-ops, non-positive quantities
//! remove the line. Nothing here can fail.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CartItem, LineItem};

// =============================================================================
// Commands
// =============================================================================

/// A cart mutation, in the shape the page dispatches it.
///
/// ```json
/// { "type": "ADD_ITEM", "payload": { "id": "fresh-milk", ... } }
/// { "type": "REMOVE_ITEM", "payload": "fresh-milk" }
/// { "type": "UPDATE_QUANTITY", "payload": { "id": "fresh-milk", "quantity": 5 } }
/// { "type": "CLEAR_CART" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum CartCommand {
    /// Add one unit of a product.
    AddItem(CartItem),

    /// Drop a line entirely.
    RemoveItem(String),

    /// Set the absolute quantity of a line; `quantity <= 0` drops it.
    UpdateQuantity { id: String, quantity: i64 },

    /// Empty the cart.
    ClearCart,
}

// =============================================================================
// Cart State
// =============================================================================

/// The cart: ordered line items plus totals derived from them.
///
/// ## Invariants
/// - Items are unique by `id`, in the order they were first added
/// - Every `quantity >= 1`
/// - `item_count == Σ quantity` and `total == Σ price × quantity`
///
/// The derived fields are private and only written by [`CartState::recompute`],
/// which runs after every command.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartState {
    items: Vec<LineItem>,
    item_count: i64,
    total: Money,
}

impl CartState {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Rebuilds a cart from previously stored lines.
    ///
    /// ## Normalization
    /// - Lines with `quantity < 1` are dropped
    /// - A repeated id is merged into its first occurrence (quantities add)
    /// - Totals are recomputed, never trusted from storage
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = CartState::new();
        for item in items.into_iter().filter(|i| i.quantity >= 1) {
            match cart.items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity)
                }
                None => cart.items.push(item),
            }
        }
        cart.recompute();
        cart
    }

    /// Applies one command and returns the resulting state.
    ///
    /// The receiver is left untouched; callers hold on to snapshots freely.
    pub fn apply(&self, command: &CartCommand) -> CartState {
        let mut next = self.clone();
        match command {
            CartCommand::AddItem(item) => next.add_item(item),
            CartCommand::RemoveItem(id) => next.remove_item(id),
            CartCommand::UpdateQuantity { id, quantity } => next.update_quantity(id, *quantity),
            CartCommand::ClearCart => next.items.clear(),
        }
        next.recompute();
        next
    }

    fn add_item(&mut self, item: &CartItem) {
        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.items.push(LineItem::from_cart_item(item)),
        }
    }

    fn remove_item(&mut self, id: &str) {
        self.items.retain(|line| line.id != id);
    }

    fn update_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }
    }

    fn recompute(&mut self) {
        self.item_count = self
            .items
            .iter()
            .fold(0i64, |acc, line| acc.saturating_add(line.quantity));
        self.total = self.items.iter().map(LineItem::line_total).sum();
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Total units across all lines (the badge number).
    pub fn item_count(&self) -> i64 {
        self.item_count
    }

    /// Σ price × quantity.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Looks up a line by product id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|line| line.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Pure transition `(CartState, CartCommand) -> CartState`.
pub fn reduce(state: &CartState, command: &CartCommand) -> CartState {
    state.apply(command)
}
