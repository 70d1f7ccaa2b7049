//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│ Cleared  │       │
//! │  │  Cart    │     │          │     │   Form   │     │ (timer)  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                  │             │
//! │                   add_to_cart                             │             │
//! │                   update_cart_item                        │             │
//! │                   remove_from_cart                        │             │
//! │                        │                                  │             │
//! │                        ▼                                  ▼             │
//! │                   clear_cart ─────────────────────► (back to empty)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command returns the full cart snapshot so the page re-renders from
//! one consistent value.

use mildar_core::validation::validate_cart_item;
use mildar_core::{CartCommand, CartState, Catalog, CoreError};
use tracing::debug;

use crate::error::ApiError;
use crate::state::CartStore;

/// Gets the current cart contents.
pub fn get_cart(cart: &CartStore) -> CartState {
    debug!("get_cart command");
    cart.snapshot()
}

/// Adds one unit of a catalog product ("Add to Cart" on a product card).
///
/// ## Errors
/// `NOT_FOUND` when the id is not in the catalog. The cart command itself
/// cannot fail.
pub fn add_to_cart(catalog: &Catalog, cart: &CartStore, product_id: &str) -> Result<CartState, ApiError> {
    debug!(%product_id, "add_to_cart command");
    let product = catalog.require(product_id)?;
    Ok(cart.dispatch(CartCommand::AddItem(product.cart_item())))
}

/// Sets the quantity of a line; zero or less removes it.
pub fn update_cart_item(cart: &CartStore, product_id: &str, quantity: i64) -> CartState {
    debug!(%product_id, quantity, "update_cart_item command");
    cart.dispatch(CartCommand::UpdateQuantity {
        id: product_id.to_string(),
        quantity,
    })
}

/// Removes a line (trash icon). Unknown ids are ignored.
pub fn remove_from_cart(cart: &CartStore, product_id: &str) -> CartState {
    debug!(%product_id, "remove_from_cart command");
    cart.dispatch(CartCommand::RemoveItem(product_id.to_string()))
}

/// Empties the cart.
pub fn clear_cart(cart: &CartStore) -> CartState {
    debug!("clear_cart command");
    cart.dispatch(CartCommand::ClearCart)
}

/// Applies a raw command as the page dispatches it
/// (`{"type": "ADD_ITEM", "payload": {...}}`).
///
/// ## Errors
/// `VALIDATION_ERROR` when an `ADD_ITEM` payload has a bad id or a negative
/// price. The cart is left unchanged.
pub fn dispatch(cart: &CartStore, command: CartCommand) -> Result<CartState, ApiError> {
    debug!(?command, "dispatch command");
    if let CartCommand::AddItem(item) = &command {
        validate_cart_item(item).map_err(CoreError::from)?;
    }
    Ok(cart.dispatch(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_add_from_catalog() {
        let catalog = Catalog::dairy();
        let cart = CartStore::new();

        add_to_cart(&catalog, &cart, "fresh-milk").unwrap();
        let state = add_to_cart(&catalog, &cart, "fresh-milk").unwrap();
        assert_eq!(state.item_count(), 2);
        assert_eq!(state.total().cents(), 998);

        let state = update_cart_item(&cart, "fresh-milk", 5);
        assert_eq!(state.total().cents(), 2495);

        let state = remove_from_cart(&cart, "fresh-milk");
        assert!(state.is_empty());
        assert_eq!(get_cart(&cart), state);
    }

    #[test]
    fn test_unknown_product() {
        let err = add_to_cart(&Catalog::dairy(), &CartStore::new(), "goat-milk").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_decrement_to_zero_removes() {
        let catalog = Catalog::dairy();
        let cart = CartStore::new();
        add_to_cart(&catalog, &cart, "heavy-cream").unwrap();

        // The [-] button sends quantity - 1.
        let state = update_cart_item(&cart, "heavy-cream", 0);
        assert!(!state.contains("heavy-cream"));
    }

    #[test]
    fn test_dispatch_raw_command() {
        let cart = CartStore::new();
        let command: CartCommand = serde_json::from_str(
            r#"{"type":"ADD_ITEM","payload":{"id":"kefir","name":"Kefir","price":349,"image":"","unit":"per bottle"}}"#,
        )
        .unwrap();
        let state = dispatch(&cart, command).unwrap();
        assert_eq!(state.total().cents(), 349);

        let state = clear_cart(&cart);
        assert_eq!(state.item_count(), 0);
    }

    #[test]
    fn test_dispatch_rejects_negative_price() {
        let cart = CartStore::new();
        let command: CartCommand = serde_json::from_str(
            r#"{"type":"ADD_ITEM","payload":{"id":"kefir","name":"Kefir","price":-500,"image":"","unit":"per bottle"}}"#,
        )
        .unwrap();

        let err = dispatch(&cart, command).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(get_cart(&cart).is_empty());
        assert_eq!(get_cart(&cart).total().cents(), 0);
    }

    #[test]
    fn test_dispatch_rejects_blank_id() {
        let cart = CartStore::new();
        let command: CartCommand = serde_json::from_str(
            r#"{"type":"ADD_ITEM","payload":{"id":" ","name":"Kefir","price":349,"image":"","unit":"per bottle"}}"#,
        )
        .unwrap();

        assert_eq!(dispatch(&cart, command).unwrap_err().code, ErrorCode::ValidationError);
        assert!(get_cart(&cart).is_empty());
    }
}
