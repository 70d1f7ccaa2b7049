//! # Validation Module
//!
//! Input validation for catalog entries and untrusted cart payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Catalog load (THIS MODULE)                                   │
//! │  ├── Product ids: present, bounded length, no whitespace               │
//! │  └── Price labels: parse exactly, never negative                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command boundary (raw ADD_ITEM payloads, snapshots)           │
//! │  └── validate_cart_item: same id and price rules                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart reducer                                                 │
//! │  └── Trusts the price it is given; never fails                         │
//! │                                                                         │
//! │  Contact/delivery fields in the checkout form are NOT validated.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mildar_core::validation::{validate_price_label, validate_product_id};
//!
//! validate_product_id("fresh-milk").unwrap();
//! assert_eq!(validate_price_label("$4.99").unwrap().cents(), 499);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::CartItem;
use crate::MAX_PRODUCT_ID_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a product identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - No whitespace (ids appear in shell commands and URLs)
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.chars().count() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    if id.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates that a text field is present.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Parses and validates a price label (`"$4.99"`).
pub fn validate_price_label(label: &str) -> ValidationResult<Money> {
    let price = Money::parse_label(label)?;
    validate_price(price)?;
    Ok(price)
}

/// Validates a price already in cents.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a cart item arriving from outside the catalog.
pub fn validate_cart_item(item: &CartItem) -> ValidationResult<()> {
    validate_product_id(&item.id)?;
    validate_price(item.price)
}
