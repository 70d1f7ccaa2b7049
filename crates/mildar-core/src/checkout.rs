//! # Checkout Flow
//!
//! The cart drawer's state machine. This module only decides which
//! transitions are legal; the payment delay itself is scheduled by the
//! storefront app.
//!
//! ## Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐  proceed   ┌──────────────┐  submit   ┌───────────────┐  │
//! │   │ Browsing │ ─────────► │ CheckoutForm │ ────────► │PaymentPending │  │
//! │   │          │ ◄───────── │              │ ◄──────── │               │  │
//! │   └──────────┘    back    └──────────────┘  cancel   └───────┬───────┘  │
//! │        ▲                                                     │          │
//! │        │ finish (drawer closes)          complete_payment    │          │
//! │        │                                 → ClearCart         ▼          │
//! │        │                                             ┌───────────────┐  │
//! │        └──────────────────────────────────────────── │    Cleared    │  │
//! │                                                      └───────────────┘  │
//! │                                                                         │
//! │  "proceed" and "submit" need a non-empty cart.                          │
//! │  Drawer open/closed is tracked separately and never resets the phase.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{CartCommand, CartState};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::PAYMENT_NOTICE;

/// Where the drawer is in the checkout walk-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum CheckoutPhase {
    /// Items and the "Proceed to Checkout" button.
    #[default]
    Browsing,

    /// Email / phone / delivery address inputs.
    CheckoutForm,

    /// "Payment link sent" notice, waiting for the delay to elapse.
    PaymentPending,

    /// Cart cleared; about to return to browsing.
    Cleared,
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutPhase::Browsing => write!(f, "browsing"),
            CheckoutPhase::CheckoutForm => write!(f, "the checkout form is open"),
            CheckoutPhase::PaymentPending => write!(f, "a payment is pending"),
            CheckoutPhase::Cleared => write!(f, "the cart is being cleared"),
        }
    }
}

/// Fields from the checkout form. Collected as typed; never validated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// A submitted order waiting for the simulated payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPayment {
    pub order_ref: Uuid,
    pub submitted_at: DateTime<Utc>,
    /// Cart total at submission.
    pub amount: Money,
    pub item_count: i64,
    pub contact: ContactDetails,
    pub notice: String,
}

// =============================================================================
// Checkout Flow
// =============================================================================

/// The drawer: visibility, phase and the pending payment, if any.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFlow {
    drawer_open: bool,
    phase: CheckoutPhase,
    pending: Option<PendingPayment>,
}

impl CheckoutFlow {
    pub fn new() -> Self {
        CheckoutFlow::default()
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    pub fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn pending(&self) -> Option<&PendingPayment> {
        self.pending.as_ref()
    }

    pub fn open_drawer(&mut self) {
        self.drawer_open = true;
    }

    /// Hides the drawer. The phase is kept, so reopening shows the same step.
    ///
    /// Returns `true` if a payment is still pending.
    pub fn close_drawer(&mut self) -> bool {
        self.drawer_open = false;
        self.phase == CheckoutPhase::PaymentPending
    }

    /// Whether "Proceed to Checkout" is enabled.
    pub fn can_proceed(&self, cart: &CartState) -> bool {
        self.phase == CheckoutPhase::Browsing && !cart.is_empty()
    }

    /// Browsing → CheckoutForm.
    pub fn proceed(&mut self, cart: &CartState) -> CoreResult<()> {
        self.expect_phase(CheckoutPhase::Browsing, "proceed to checkout")?;
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        self.phase = CheckoutPhase::CheckoutForm;
        Ok(())
    }

    /// CheckoutForm → Browsing.
    pub fn back(&mut self) -> CoreResult<()> {
        self.expect_phase(CheckoutPhase::CheckoutForm, "go back")?;
        self.phase = CheckoutPhase::Browsing;
        Ok(())
    }

    /// CheckoutForm → PaymentPending ("Buy Now").
    ///
    /// Captures the cart total at this moment; the caller schedules
    /// [`CheckoutFlow::complete_payment`] after the payment delay.
    pub fn submit(&mut self, cart: &CartState, contact: ContactDetails) -> CoreResult<&PendingPayment> {
        self.expect_phase(CheckoutPhase::CheckoutForm, "submit an order")?;
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        self.phase = CheckoutPhase::PaymentPending;
        Ok(&*self.pending.insert(PendingPayment {
            order_ref: Uuid::new_v4(),
            submitted_at: Utc::now(),
            amount: cart.total(),
            item_count: cart.item_count(),
            contact,
            notice: PAYMENT_NOTICE.to_string(),
        }))
    }

    /// PaymentPending → CheckoutForm. The cart is left as it was.
    pub fn cancel_payment(&mut self) -> CoreResult<PendingPayment> {
        self.expect_phase(CheckoutPhase::PaymentPending, "cancel a payment")?;
        self.phase = CheckoutPhase::CheckoutForm;
        self.pending
            .take()
            .ok_or(CoreError::InvalidTransition {
                phase: CheckoutPhase::CheckoutForm,
                action: "cancel a payment",
            })
    }

    /// PaymentPending → Cleared, yielding the command that empties the cart.
    ///
    /// `order_ref` must match the pending payment; a timer that outlived a
    /// cancelled order is rejected.
    pub fn complete_payment(&mut self, order_ref: Uuid) -> CoreResult<CartCommand> {
        self.expect_phase(CheckoutPhase::PaymentPending, "complete a payment")?;
        if self.pending.as_ref().map(|p| p.order_ref) != Some(order_ref) {
            return Err(CoreError::InvalidTransition {
                phase: self.phase,
                action: "complete a superseded payment",
            });
        }
        self.phase = CheckoutPhase::Cleared;
        Ok(CartCommand::ClearCart)
    }

    /// Cleared → Browsing, drawer closed.
    pub fn finish(&mut self) -> CoreResult<PendingPayment> {
        self.expect_phase(CheckoutPhase::Cleared, "finish checkout")?;
        self.phase = CheckoutPhase::Browsing;
        self.drawer_open = false;
        self.pending.take().ok_or(CoreError::InvalidTransition {
            phase: CheckoutPhase::Browsing,
            action: "finish checkout",
        })
    }

    fn expect_phase(&self, expected: CheckoutPhase, action: &'static str) -> CoreResult<()> {
        if self.phase != expected {
            return Err(CoreError::InvalidTransition {
                phase: self.phase,
                action,
            });
        }
        Ok(())
    }
}
