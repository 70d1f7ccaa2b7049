//! # Error Types
//!
//! Domain-specific error types for mildar-core.
//!
//! ## Where Errors Can Happen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  Cart commands           → NEVER fail (unknown id = no-op)             │
//! │                                                                         │
//! │  mildar-core errors (this file)                                        │
//! │  ├── CoreError        - Checkout transitions, unknown products         │
//! │  └── ValidationError  - Catalog input, raw cart payloads               │
//! │                                                                         │
//! │  storefront errors (app crate)                                         │
//! │  ├── StorefrontError  - Config, snapshots, I/O                         │
//! │  └── ApiError         - What the page sees (serialized)                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Page                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::checkout::CheckoutPhase;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The checkout flow cannot perform `action` from its current phase.
    ///
    /// ## When This Occurs
    /// - "Back" while browsing
    /// - "Buy Now" before the checkout form is shown
    /// - Cancelling when no payment is pending
    #[error("Cannot {action} while {phase}")]
    InvalidTransition {
        phase: CheckoutPhase,
        action: &'static str,
    },

    /// Checkout needs at least one item in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while building a catalog from external entries. The cart itself
/// trusts the prices it is given.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., unparseable price label).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two catalog entries with one id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
