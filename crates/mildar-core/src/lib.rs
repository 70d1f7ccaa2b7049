//! # mildar-core: Pure Business Logic for the Mildar Storefront
//!
//! This crate holds everything about the farm shop that has rules: prices,
//! the product catalog, the cart and the checkout drawer. It has zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Mildar Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (promotional page)                 │   │
//! │  │     Product cards ──► Cart badge ──► Cart drawer ──► Buy Now    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain-data commands                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  storefront (runtime shell)                     │   │
//! │  │     CartStore, CheckoutService, config, snapshots               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ mildar-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────────┐          │   │
//! │  │   │  money  │  │ catalog │  │  cart   │  │ checkout │          │   │
//! │  │   │  Money  │  │ Product │  │ reducer │  │  phases  │          │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • PURE FUNCTIONS                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Line items and the add-to-cart payload
//! - [`catalog`] - The farm's products
//! - [`cart`] - Cart state and its four commands
//! - [`checkout`] - Drawer / checkout state machine
//! - [`validation`] - Catalog input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use mildar_core::cart::{CartCommand, CartState};
//! use mildar_core::catalog::Catalog;
//!
//! let catalog = Catalog::dairy();
//! let milk = catalog.get("fresh-milk").unwrap().cart_item();
//!
//! let cart = CartState::new()
//!     .apply(&CartCommand::AddItem(milk.clone()))
//!     .apply(&CartCommand::AddItem(milk));
//!
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total().cents(), 998);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartCommand, CartState};
pub use catalog::{Catalog, Product};
pub use checkout::{CheckoutFlow, CheckoutPhase, ContactDetails, PendingPayment};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::{CartItem, LineItem};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product identifier.
pub const MAX_PRODUCT_ID_LEN: usize = 64;

/// Message shown in the drawer while the simulated payment is pending.
pub const PAYMENT_NOTICE: &str = "Payment link sent to your email!";
