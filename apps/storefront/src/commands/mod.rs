//! # Storefront Commands
//!
//! The inbound surface the page (or the shell) calls. Commands take only the
//! state they need and return serializable values or an [`ApiError`].
//!
//! | Module       | Commands                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`catalog`]  | `list_products`, `get_product`                             |
//! | [`cart`]     | `get_cart`, `add_to_cart`, `update_cart_item`, `remove_from_cart`, `clear_cart`, `dispatch` |
//! | [`checkout`] | `get_checkout`, `open_cart`, `close_cart`, `proceed_to_checkout`, `back_to_cart`, `buy_now`, `cancel_payment` |
//!
//! [`ApiError`]: crate::error::ApiError

pub mod cart;
pub mod catalog;
pub mod checkout;
