//! # Cart Snapshots
//!
//! Optional persistence of the cart across restarts (off by default).
//!
//! ## File Layout
//! ```json
//! {
//!   "version": 1,
//!   "savedAt": "2026-10-18T09:30:00Z",
//!   "items": [
//!     { "id": "fresh-milk", "name": "Fresh Whole Milk", "price": 499,
//!       "image": "/milk.png", "unit": "per gallon", "quantity": 2 }
//!   ]
//! }
//! ```
//!
//! Only the lines are written. `itemCount` and `total` are recomputed by
//! `CartState::from_items` on load, which also drops zero-quantity lines and
//! merges repeated ids. Lines with a bad id or a negative price are dropped.
//!
//! ## Autosave
//! ```text
//! CartStore ──watch──► autosave task ──spawn_blocking──► cart.json
//!                           ▲
//!      Autosave::shutdown ──┘  (writes the latest cart, then stops)
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mildar_core::validation::{validate_price, validate_product_id};
use mildar_core::{CartState, LineItem};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{StorefrontError, StorefrontResult};
use crate::state::cart::CartStore;

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk cart snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
}

impl CartSnapshot {
    pub fn capture(cart: &CartState) -> Self {
        CartSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            items: cart.items().to_vec(),
        }
    }

    /// Rebuilds the cart, rejecting unknown layouts.
    pub fn restore(self) -> StorefrontResult<CartState> {
        if self.version != SNAPSHOT_VERSION {
            return Err(StorefrontError::UnsupportedSnapshot {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        let items: Vec<LineItem> = self.items.into_iter().filter(is_valid_line).collect();
        Ok(CartState::from_items(items))
    }
}

fn is_valid_line(line: &LineItem) -> bool {
    match validate_product_id(&line.id).and_then(|_| validate_price(line.price)) {
        Ok(()) => true,
        Err(e) => {
            warn!(id = %line.id, "Dropping invalid snapshot line: {}", e);
            false
        }
    }
}

/// Reads and writes the snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved cart. A missing file is an empty cart.
    pub fn load(&self) -> StorefrontResult<CartState> {
        if !self.path.exists() {
            debug!(path = ?self.path, "No cart snapshot, starting empty");
            return Ok(CartState::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let snapshot: CartSnapshot = serde_json::from_str(&contents)?;
        let saved_at = snapshot.saved_at;
        let cart = snapshot.restore()?;

        info!(
            path = ?self.path,
            %saved_at,
            item_count = cart.item_count(),
            "Cart snapshot restored"
        );
        Ok(cart)
    }

    /// Writes the cart, replacing the previous snapshot atomically.
    pub fn save(&self, cart: &CartState) -> StorefrontResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&CartSnapshot::capture(cart))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!(path = ?self.path, item_count = cart.item_count(), "Cart snapshot saved");
        Ok(())
    }

    /// Saves after every cart change until [`Autosave::shutdown`] or the
    /// store is dropped.
    pub fn spawn_autosave(self, store: &CartStore) -> Autosave {
        let mut changes = store.subscribe();
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let join = tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let cart = changes.borrow_and_update().clone();
                        self.save_in_background(cart).await;
                    }

                    _ = shutdown_rx.recv() => {
                        let cart = changes.borrow_and_update().clone();
                        self.save_in_background(cart).await;
                        info!("Cart autosave received shutdown");
                        break;
                    }
                }
            }
            debug!("Cart autosave stopped");
        });

        Autosave { shutdown_tx, join }
    }

    async fn save_in_background(&self, cart: CartState) {
        let file = self.clone();
        match tokio::task::spawn_blocking(move || file.save(&cart)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to save cart snapshot: {}", e),
            Err(e) => warn!("Cart snapshot writer failed: {}", e),
        }
    }
}

// =============================================================================
// Autosave Handle
// =============================================================================

/// Handle to the running autosave task.
#[derive(Debug)]
pub struct Autosave {
    shutdown_tx: mpsc::Sender<()>,
    join: JoinHandle<()>,
}

impl Autosave {
    /// Writes the current cart one last time and waits for the task to end.
    pub async fn shutdown(self) -> StorefrontResult<()> {
        let _ = self.shutdown_tx.send(()).await;
        Ok(self.join.await?)
    }
}
