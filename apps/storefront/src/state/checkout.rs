//! # Checkout Service
//!
//! Drives the core `CheckoutFlow` and owns the simulated payment timer.
//!
//! ## Payment Timer
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  submit() ──► flow: CheckoutForm → PaymentPending                       │
//! │     │                                                                   │
//! │     └──► tokio::spawn ── select! ──┬── sleep(payment_delay) ──┐         │
//! │                                    │                          ▼         │
//! │                                    │        flow.complete_payment()     │
//! │                                    │        cart.dispatch(ClearCart)    │
//! │                                    │        flow.finish() (drawer shut) │
//! │                                    │                                    │
//! │                                    └── cancel.notified() ──► Cancelled  │
//! │                                                                         │
//! │  cancel_payment() / close_drawer() with cancel_on_close:                │
//! │     flow: PaymentPending → CheckoutForm, then notify the timer.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lock order is always flow, then cart or the cancel slot. The cancel slot is
//! keyed by order ref, so a cancel only ever stops its own timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use mildar_core::{CheckoutFlow, CheckoutPhase, ContactDetails, CoreResult, PendingPayment};
use serde::Serialize;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::CheckoutSettings;
use crate::error::StorefrontResult;
use crate::state::cart::CartStore;

/// What the drawer currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub phase: CheckoutPhase,
    pub drawer_open: bool,
    /// Whether "Proceed to Checkout" is enabled.
    pub can_proceed: bool,
    pub pending: Option<PendingPayment>,
}

/// How a scheduled payment ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "orderRef")]
pub enum PaymentOutcome {
    /// Delay elapsed; the cart was cleared.
    Completed(Uuid),
    /// Cancelled before the delay elapsed.
    Cancelled(Uuid),
    /// The flow had already moved on when the timer fired.
    Superseded(Uuid),
}

/// Handle to a scheduled payment.
#[derive(Debug)]
pub struct PaymentHandle {
    pending: PendingPayment,
    service: CheckoutService,
    join: JoinHandle<PaymentOutcome>,
}

impl PaymentHandle {
    pub fn pending(&self) -> &PendingPayment {
        &self.pending
    }

    pub fn order_ref(&self) -> Uuid {
        self.pending.order_ref
    }

    /// Cancels this payment if it is still the pending one.
    ///
    /// Returns `false` when it already completed or another order replaced it.
    pub fn cancel(&self) -> bool {
        self.service.cancel_order(Some(self.pending.order_ref)).is_some()
    }

    /// Waits for the timer task to finish.
    pub async fn wait(self) -> StorefrontResult<PaymentOutcome> {
        Ok(self.join.await?)
    }
}

#[derive(Debug)]
struct CheckoutInner {
    flow: Mutex<CheckoutFlow>,
    cart: CartStore,
    settings: CheckoutSettings,
    cancel: Mutex<Option<(Uuid, Arc<Notify>)>>,
}

/// Shared checkout service. Cloning shares the same drawer.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    inner: Arc<CheckoutInner>,
}

impl CheckoutService {
    pub fn new(cart: CartStore, settings: CheckoutSettings) -> Self {
        CheckoutService {
            inner: Arc::new(CheckoutInner {
                flow: Mutex::new(CheckoutFlow::new()),
                cart,
                settings,
                cancel: Mutex::new(None),
            }),
        }
    }

    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    pub fn payment_delay(&self) -> Duration {
        self.inner.settings.payment_delay()
    }

    /// Current drawer state.
    pub fn view(&self) -> CheckoutView {
        let flow = self.flow();
        self.view_of(&flow)
    }

    pub fn open_drawer(&self) -> CheckoutView {
        let mut flow = self.flow();
        flow.open_drawer();
        self.view_of(&flow)
    }

    /// Hides the drawer. With `cancel_on_close` a pending payment is
    /// cancelled; otherwise it keeps running.
    pub fn close_drawer(&self) -> CheckoutView {
        let payment_pending = self.flow().close_drawer();
        if payment_pending {
            if self.inner.settings.cancel_on_close {
                self.cancel_order(None);
            } else {
                debug!("Drawer closed while payment pending; payment continues");
            }
        }
        self.view()
    }

    /// "Proceed to Checkout".
    pub fn proceed(&self) -> CoreResult<CheckoutView> {
        let mut flow = self.flow();
        flow.proceed(&self.inner.cart.snapshot())?;
        Ok(self.view_of(&flow))
    }

    /// "Back" from the checkout form.
    pub fn back(&self) -> CoreResult<CheckoutView> {
        let mut flow = self.flow();
        flow.back()?;
        Ok(self.view_of(&flow))
    }

    /// "Buy Now": moves to PaymentPending and schedules the cart clear.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, contact: ContactDetails) -> CoreResult<PaymentHandle> {
        let mut flow = self.flow();
        let pending = flow.submit(&self.inner.cart.snapshot(), contact)?.clone();

        let cancel = Arc::new(Notify::new());
        *self.cancel_slot() = Some((pending.order_ref, cancel.clone()));

        let delay = self.payment_delay();
        info!(
            order_ref = %pending.order_ref,
            amount = %pending.amount,
            delay_ms = delay.as_millis() as u64,
            "Payment scheduled"
        );

        let join = tokio::spawn(self.clone().run_payment_timer(pending.order_ref, delay, cancel));

        Ok(PaymentHandle {
            pending,
            service: self.clone(),
            join,
        })
    }

    /// Cancels whatever payment is pending.
    pub fn cancel_payment(&self) -> CoreResult<PendingPayment> {
        let mut flow = self.flow();
        let cancelled = flow.cancel_payment()?;
        self.notify_cancel(cancelled.order_ref);
        Ok(cancelled)
    }

    /// Cancels the pending payment, optionally only if it is `order_ref`.
    fn cancel_order(&self, order_ref: Option<Uuid>) -> Option<PendingPayment> {
        let mut flow = self.flow();
        let current = flow.pending().map(|p| p.order_ref)?;
        if flow.phase() != CheckoutPhase::PaymentPending || order_ref.is_some_and(|r| r != current) {
            return None;
        }
        let cancelled = flow.cancel_payment().ok()?;
        self.notify_cancel(cancelled.order_ref);
        Some(cancelled)
    }

    /// Signals the timer of `order_ref`. A slot holding another order is left
    /// alone.
    fn notify_cancel(&self, order_ref: Uuid) {
        if let Some((_, cancel)) = self.take_cancel(order_ref) {
            cancel.notify_one();
        }
        info!(%order_ref, "Payment cancelled");
    }

    fn take_cancel(&self, order_ref: Uuid) -> Option<(Uuid, Arc<Notify>)> {
        let mut slot = self.cancel_slot();
        if slot.as_ref().is_some_and(|(current, _)| *current == order_ref) {
            slot.take()
        } else {
            None
        }
    }

    async fn run_payment_timer(self, order_ref: Uuid, delay: Duration, cancel: Arc<Notify>) -> PaymentOutcome {
        tokio::select! {
            _ = tokio::time::sleep(delay) => self.complete(order_ref),
            _ = cancel.notified() => {
                debug!(%order_ref, "Payment timer stopped");
                PaymentOutcome::Cancelled(order_ref)
            }
        }
    }

    fn complete(&self, order_ref: Uuid) -> PaymentOutcome {
        let mut flow = self.flow();
        match flow.complete_payment(order_ref) {
            Ok(command) => {
                self.inner.cart.dispatch(command);
                if let Err(e) = flow.finish() {
                    warn!("Checkout did not return to browsing: {}", e);
                }
                self.take_cancel(order_ref);
                info!(%order_ref, "Payment completed, cart cleared");
                PaymentOutcome::Completed(order_ref)
            }
            Err(e) => {
                debug!(%order_ref, "Ignoring payment timer: {}", e);
                PaymentOutcome::Superseded(order_ref)
            }
        }
    }

    fn view_of(&self, flow: &CheckoutFlow) -> CheckoutView {
        CheckoutView {
            phase: flow.phase(),
            drawer_open: flow.is_drawer_open(),
            can_proceed: flow.can_proceed(&self.inner.cart.snapshot()),
            pending: flow.pending().cloned(),
        }
    }

    fn flow(&self) -> MutexGuard<'_, CheckoutFlow> {
        self.inner.flow.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_slot(&self) -> MutexGuard<'_, Option<(Uuid, Arc<Notify>)>> {
        self.inner.cancel.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mildar_core::{CartCommand, Catalog, CoreError};

    fn service(cancel_on_close: bool) -> CheckoutService {
        let cart = CartStore::new();
        cart.dispatch(CartCommand::AddItem(
            Catalog::dairy().get("fresh-milk").unwrap().cart_item(),
        ));
        CheckoutService::new(
            cart,
            CheckoutSettings {
                payment_delay_ms: 3000,
                cancel_on_close,
            },
        )
    }

    fn contact() -> ContactDetails {
        ContactDetails {
            email: "jo@example.com".to_string(),
            ..ContactDetails::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_clears_cart_after_delay() {
        let checkout = service(false);
        checkout.open_drawer();
        checkout.proceed().unwrap();
        let handle = checkout.submit(contact()).unwrap();
        assert_eq!(handle.pending().amount.cents(), 499);
        assert_eq!(checkout.view().phase, CheckoutPhase::PaymentPending);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(checkout.cart().snapshot().item_count(), 1);

        let order_ref = handle.order_ref();
        assert_eq!(handle.wait().await.unwrap(), PaymentOutcome::Completed(order_ref));

        let view = checkout.view();
        assert_eq!(view.phase, CheckoutPhase::Browsing);
        assert!(!view.drawer_open);
        assert!(view.pending.is_none());
        assert!(checkout.cart().snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_keeps_cart() {
        let checkout = service(false);
        checkout.proceed().unwrap();
        let handle = checkout.submit(contact()).unwrap();

        let cancelled = checkout.cancel_payment().unwrap();
        assert_eq!(cancelled.order_ref, handle.order_ref());

        let order_ref = handle.order_ref();
        assert_eq!(handle.wait().await.unwrap(), PaymentOutcome::Cancelled(order_ref));
        assert_eq!(checkout.view().phase, CheckoutPhase::CheckoutForm);
        assert_eq!(checkout.cart().snapshot().item_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_cancel() {
        let checkout = service(false);
        checkout.proceed().unwrap();
        let handle = checkout.submit(contact()).unwrap();

        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(matches!(handle.wait().await.unwrap(), PaymentOutcome::Cancelled(_)));
        assert!(!checkout.cart().snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_drawer_does_not_cancel_by_default() {
        let checkout = service(false);
        checkout.open_drawer();
        checkout.proceed().unwrap();
        let handle = checkout.submit(contact()).unwrap();

        let view = checkout.close_drawer();
        assert!(!view.drawer_open);
        assert_eq!(view.phase, CheckoutPhase::PaymentPending);

        assert!(matches!(handle.wait().await.unwrap(), PaymentOutcome::Completed(_)));
        assert!(checkout.cart().snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_drawer_cancels_when_configured() {
        let checkout = service(true);
        checkout.open_drawer();
        checkout.proceed().unwrap();
        let handle = checkout.submit(contact()).unwrap();

        let view = checkout.close_drawer();
        assert_eq!(view.phase, CheckoutPhase::CheckoutForm);

        assert!(matches!(handle.wait().await.unwrap(), PaymentOutcome::Cancelled(_)));
        assert_eq!(checkout.cart().snapshot().item_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_after_cancel_only_latest_completes() {
        let checkout = service(false);
        checkout.proceed().unwrap();
        let first = checkout.submit(contact()).unwrap();
        checkout.cancel_payment().unwrap();
        let second = checkout.submit(contact()).unwrap();

        assert!(!first.cancel());
        assert!(matches!(first.wait().await.unwrap(), PaymentOutcome::Cancelled(_)));
        let second_ref = second.order_ref();
        assert_eq!(second.wait().await.unwrap(), PaymentOutcome::Completed(second_ref));
        assert!(checkout.cart().snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_cancel_signal_spares_newer_order() {
        let checkout = service(false);
        checkout.proceed().unwrap();
        let first = checkout.submit(contact()).unwrap();

        // The flow leaves PaymentPending, a new order goes in, and only then
        // does the signal for the first order arrive.
        checkout.flow().cancel_payment().unwrap();
        let second = checkout.submit(contact()).unwrap();
        checkout.notify_cancel(first.order_ref());

        let second_ref = second.order_ref();
        assert_eq!(second.wait().await.unwrap(), PaymentOutcome::Completed(second_ref));
        let first_ref = first.order_ref();
        assert_eq!(first.wait().await.unwrap(), PaymentOutcome::Superseded(first_ref));

        assert_eq!(checkout.view().phase, CheckoutPhase::Browsing);
        assert!(checkout.cart().snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_proceed_on_empty_cart() {
        let checkout = CheckoutService::new(CartStore::new(), CheckoutSettings::default());
        assert!(!checkout.view().can_proceed);
        assert!(matches!(checkout.proceed(), Err(CoreError::EmptyCart)));
        assert!(checkout.back().is_err());
        assert!(checkout.cancel_payment().is_err());
    }
}
