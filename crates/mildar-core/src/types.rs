//! # Cart Types
//!
//! The two shapes a product takes on its way into the cart.
//!
//! ```text
//! ┌─────────────────┐   AddItem    ┌─────────────────┐
//! │    CartItem     │ ───────────► │    LineItem     │
//! │  ─────────────  │              │  ─────────────  │
//! │  id             │              │  id             │
//! │  name           │              │  name           │
//! │  price (Money)  │              │  price (Money)  │
//! │  image          │              │  image          │
//! │  unit           │              │  unit           │
//! └─────────────────┘              │  quantity ≥ 1   │
//!                                  └─────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Cart Item (AddItem payload)
// =============================================================================

/// The product data a product card hands to the cart.
///
/// The price is trusted here: it was validated when the catalog was built,
/// or by `validate_cart_item` when the payload came from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Stable product identifier, e.g. `"fresh-milk"`.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price in cents.
    pub price: Money,

    /// Image path for the drawer thumbnail.
    pub image: String,

    /// Unit label, e.g. `"per gallon"`.
    pub unit: String,
}

// =============================================================================
// Line Item
// =============================================================================

/// One product in the cart together with its requested quantity.
///
/// ## Invariants (held by `CartState`)
/// - `quantity >= 1`
/// - `id` is unique within the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub image: String,
    pub unit: String,
    pub quantity: i64,
}

impl LineItem {
    /// Starts a new line with quantity 1.
    pub fn from_cart_item(item: &CartItem) -> Self {
        LineItem {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
            unit: item.unit.clone(),
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}
