//! # Storefront State
//!
//! ```text
//! ┌────────────────┐ ┌──────────────────┐ ┌──────────────┐ ┌──────────────┐
//! │   CartStore    │ │ CheckoutService  │ │   Catalog    │ │ SnapshotFile │
//! │  cart + watch  │ │ drawer + timer   │ │  read-only   │ │  optional    │
//! └────────────────┘ └──────────────────┘ └──────────────┘ └──────────────┘
//! ```
//!
//! Each command only takes the pieces it needs.

pub mod cart;
pub mod checkout;
pub mod snapshot;

pub use cart::CartStore;
pub use checkout::{CheckoutService, CheckoutView, PaymentHandle, PaymentOutcome};
pub use snapshot::{Autosave, CartSnapshot, SnapshotFile};

use std::sync::Arc;

use mildar_core::{CartState, Catalog};
use tracing::{info, warn};

use crate::config::StorefrontConfig;
use crate::error::StorefrontResult;

/// Everything the command layer works against.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub cart: CartStore,
    pub checkout: CheckoutService,
    pub snapshots: Option<SnapshotFile>,
}

impl AppState {
    /// Builds state from configuration: catalog, restored cart (when
    /// persistence is on), and the checkout service.
    ///
    /// An unreadable snapshot is logged and replaced by an empty cart; a bad
    /// catalog is an error.
    pub fn from_config(config: &StorefrontConfig) -> StorefrontResult<Self> {
        let catalog = Arc::new(config.load_catalog()?);
        info!(products = catalog.len(), "Catalog loaded");

        let snapshots = if config.persistence.enabled {
            match config.persistence.snapshot_path() {
                Some(path) => Some(SnapshotFile::new(path)),
                None => {
                    warn!("Cart persistence enabled but no data directory is available");
                    None
                }
            }
        } else {
            None
        };

        let initial = match &snapshots {
            Some(file) => file.load().unwrap_or_else(|e| {
                warn!("Discarding unreadable cart snapshot: {}", e);
                CartState::new()
            }),
            None => CartState::new(),
        };

        let cart = CartStore::with_state(initial);
        let checkout = CheckoutService::new(cart.clone(), config.checkout.clone());

        Ok(AppState {
            catalog,
            cart,
            checkout,
            snapshots,
        })
    }

    /// In-memory state with the built-in catalog and default settings.
    pub fn in_memory() -> Self {
        let cart = CartStore::new();
        AppState {
            catalog: Arc::new(Catalog::dairy()),
            checkout: CheckoutService::new(cart.clone(), Default::default()),
            cart,
            snapshots: None,
        }
    }
}
