//! # Checkout Commands
//!
//! ## Drawer Walk-Through
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open_cart ──► proceed_to_checkout ──► buy_now ──► (delay) ──► cleared  │
//! │                      ▲       │            │                             │
//! │                      │       ▼            ▼                             │
//! │                      └── back_to_cart   cancel_payment                  │
//! │                                                                         │
//! │  close_cart at any point hides the drawer.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mildar_core::{ContactDetails, PendingPayment};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{CheckoutService, CheckoutView};

/// Response to "Buy Now".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyNowResponse {
    pub pending: PendingPayment,
    /// When the cart will be cleared, relative to now.
    pub payment_delay_ms: u64,
}

pub fn get_checkout(checkout: &CheckoutService) -> CheckoutView {
    debug!("get_checkout command");
    checkout.view()
}

/// Opens the cart drawer (cart button).
pub fn open_cart(checkout: &CheckoutService) -> CheckoutView {
    debug!("open_cart command");
    checkout.open_drawer()
}

/// Closes the cart drawer (X button or overlay click).
pub fn close_cart(checkout: &CheckoutService) -> CheckoutView {
    debug!("close_cart command");
    checkout.close_drawer()
}

/// "Proceed to Checkout".
pub fn proceed_to_checkout(checkout: &CheckoutService) -> Result<CheckoutView, ApiError> {
    debug!("proceed_to_checkout command");
    Ok(checkout.proceed()?)
}

/// "Back" on the checkout form.
pub fn back_to_cart(checkout: &CheckoutService) -> Result<CheckoutView, ApiError> {
    debug!("back_to_cart command");
    Ok(checkout.back()?)
}

/// "Buy Now". The cart clears once the payment delay elapses.
///
/// Must be called from within a tokio runtime.
pub fn buy_now(checkout: &CheckoutService, contact: ContactDetails) -> Result<BuyNowResponse, ApiError> {
    debug!("buy_now command");
    let handle = checkout.submit(contact)?;
    Ok(BuyNowResponse {
        pending: handle.pending().clone(),
        payment_delay_ms: checkout.payment_delay().as_millis() as u64,
    })
}

/// Cancels the pending payment and returns to the checkout form.
pub fn cancel_payment(checkout: &CheckoutService) -> Result<PendingPayment, ApiError> {
    debug!("cancel_payment command");
    Ok(checkout.cancel_payment()?)
}
