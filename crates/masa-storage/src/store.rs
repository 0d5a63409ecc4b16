//! # Cart Store
//!
//! The one place cart mutations happen. Every mutation:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. re-read the stored cart (another tab may have written)              │
//! │  2. apply the change with masa-core's Cart                              │
//! │  3. write the whole cart back (failures logged, never surfaced)         │
//! │  4. notify "cart-updated" (and "open-cart" after an add)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 3 and 4 run even when the change was a no-op, so a stored cart
//! that needed normalizing is rewritten by any mutation.
//!
//! Once a write fails the session cart is ahead of storage. Step 1 is then
//! skipped until a write succeeds again, so nothing the shopper did in
//! this session is replaced by the stale stored copy.
//!
//! The store holds its cart behind a `Mutex` so one store can be shared
//! between threads the way the desktop shell shares its cart state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use masa_core::validation::validate_customer;
use masa_core::{
    AddOutcome, Cart, CartLineItem, CartTotals, CheckoutSnapshot, CommerceEvent, CustomerDetails,
    ItemSpec, LineKey, StoreConfig, TrackedEvent,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::KeyValueStorage;
use crate::codec::{read_cart, write_cart};
use crate::error::CheckoutError;
use crate::signal::{CartNotifier, CartSignal};

// =============================================================================
// Receipts
// =============================================================================

/// What [`CartStore::add_item`] did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReceipt {
    pub outcome: AddOutcome,
    /// The stored line after the add.
    pub item: CartLineItem,
    pub totals: CartTotals,
    /// AddToCart payload for the pixel and conversion endpoint.
    pub event: TrackedEvent,
}

/// What [`CartStore::checkout`] handed off.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub snapshot: CheckoutSnapshot,
    /// Purchase payload, sharing its id between pixel and server.
    pub event: TrackedEvent,
}

/// External channel an order is handed to (chat message, order API).
pub trait OrderHandoff {
    /// Delivers the order. An error leaves the cart untouched.
    fn hand_off(&self, order: &CheckoutSnapshot) -> Result<(), String>;
}

// =============================================================================
// Cart Store
// =============================================================================

/// The shared, persisted cart.
pub struct CartStore {
    storage: Arc<dyn KeyValueStorage>,
    notifier: Arc<dyn CartNotifier>,
    config: StoreConfig,
    cart: Mutex<Cart>,
    /// Set while the last write failed. Only touched with `cart` locked.
    unsaved: AtomicBool,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.storage)
            .field("storage_key", &self.config.storage_key)
            .field("unsaved", &self.unsaved.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Opens the store, rehydrating the cart from `storage`.
    ///
    /// Missing or corrupt data yields an empty cart; nothing is written
    /// until the first mutation.
    pub fn open(
        storage: Arc<dyn KeyValueStorage>,
        notifier: Arc<dyn CartNotifier>,
        config: StoreConfig,
    ) -> Self {
        let cart = read_cart(storage.as_ref(), &config.storage_key).unwrap_or_default();
        info!(
            key = %config.storage_key,
            lines = cart.len(),
            units = cart.total_quantity(),
            "Cart store opened"
        );
        CartStore {
            storage,
            notifier,
            config,
            cart: Mutex::new(cart),
            unsaved: AtomicBool::new(false),
        }
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Poison recovery: a panicked holder cannot leave `Cart` half-updated,
    /// since every `Cart` method keeps its invariants on return.
    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one read-modify-write cycle. `f` reports whether it changed
    /// anything; the cart is written and announced either way.
    fn mutate<R>(&self, f: impl FnOnce(&mut Cart) -> (bool, R)) -> (bool, R) {
        let (changed, result) = {
            let mut cart = self.lock();
            if !self.unsaved.load(Ordering::Relaxed) {
                if let Some(stored) = read_cart(self.storage.as_ref(), &self.config.storage_key) {
                    *cart = stored;
                }
            }

            let (changed, result) = f(&mut cart);
            let saved = write_cart(self.storage.as_ref(), &self.config.storage_key, &cart);
            if self.unsaved.swap(!saved, Ordering::Relaxed) && saved {
                info!(lines = cart.len(), "Session cart persisted again");
            }
            (changed, result)
        };

        self.notifier.notify(CartSignal::Changed);
        (changed, result)
    }

    /// Whether the session cart holds changes the last write failed to
    /// persist.
    pub fn has_unsaved_changes(&self) -> bool {
        let _cart = self.lock();
        self.unsaved.load(Ordering::Relaxed)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `spec`, merging into an existing line with the same
    /// product, color and size.
    ///
    /// Also asks listeners to open the cart drawer.
    pub fn add_item(&self, spec: ItemSpec) -> AddReceipt {
        let key = spec.key();
        let (_, (outcome, item, totals)) = self.mutate(|cart| {
            let outcome = cart.add_item(spec);
            let item = cart.get(&key).cloned().unwrap_or_default();
            let totals = cart.totals(&self.config.pricing);
            (true, (outcome, item, totals))
        });
        self.notifier.notify(CartSignal::OpenRequested);

        debug!(
            product_id = %item.product_id,
            color = %item.color_name,
            size = %item.size,
            quantity = item.quantity,
            "Item added to cart"
        );

        let event = TrackedEvent::new(
            CommerceEvent::AddToCart {
                item: item.clone(),
                totals,
            },
            self.config.currency_code.clone(),
        );
        AddReceipt {
            outcome,
            item,
            totals,
            event,
        }
    }

    /// Removes the line matching `key`. Returns false if there was none;
    /// the cart is still persisted and announced.
    pub fn remove_item(&self, key: &LineKey) -> bool {
        let (removed, _) = self.mutate(|cart| (cart.remove_item(key), ()));
        if removed {
            debug!(product_id = %key.product_id, "Item removed from cart");
        }
        removed
    }

    /// Sets a line's quantity. Values below 1 remove the line.
    ///
    /// Returns false if no line matched or the quantity was already set.
    /// The cart is persisted and announced either way.
    pub fn update_quantity(&self, key: &LineKey, quantity: i64) -> bool {
        let (changed, _) = self.mutate(|cart| (cart.update_quantity(key, quantity), ()));
        changed
    }

    /// Empties the cart. Returns false if it was already empty.
    pub fn clear(&self) -> bool {
        let (cleared, _) = self.mutate(|cart| {
            let had_items = !cart.is_empty();
            cart.clear();
            (had_items, ())
        });
        cleared
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current lines, in insertion order.
    pub fn items(&self) -> Vec<CartLineItem> {
        self.lock().items().to_vec()
    }

    /// Current totals.
    pub fn totals(&self) -> CartTotals {
        self.lock().totals(&self.config.pricing)
    }

    /// A copy of the whole cart.
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    /// Re-reads storage after another tab wrote. Returns true if the cart
    /// changed. Listeners are not notified; the caller is one.
    ///
    /// Does nothing while the session cart has unsaved changes.
    pub fn reload(&self) -> bool {
        let mut cart = self.lock();
        if self.unsaved.load(Ordering::Relaxed) {
            debug!("Session cart is unsaved, skipping reload");
            return false;
        }
        let Some(stored) = read_cart(self.storage.as_ref(), &self.config.storage_key) else {
            return false;
        };
        if *cart == stored {
            return false;
        }
        *cart = stored;
        true
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// InitiateCheckout payload for the current cart.
    pub fn initiate_checkout(&self) -> TrackedEvent {
        let cart = self.lock();
        let event = CommerceEvent::initiate_checkout(cart.items(), cart.totals(&self.config.pricing));
        TrackedEvent::new(event, self.config.currency_code.clone())
    }

    /// Validates `customer`, hands the priced order to `handoff` and clears
    /// the cart once the handoff succeeds.
    ///
    /// ## Errors
    /// - [`CheckoutError::EmptyCart`] when there is nothing to order
    /// - [`CheckoutError::InvalidCustomer`] when the form fails validation
    /// - [`CheckoutError::Handoff`] when the channel fails; the cart is kept
    pub fn checkout(
        &self,
        customer: CustomerDetails,
        handoff: &dyn OrderHandoff,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        validate_customer(&customer, &self.config.governorates)?;

        self.reload();
        let snapshot = {
            let cart = self.lock();
            if cart.is_empty() {
                return Err(CheckoutError::EmptyCart);
            }
            CheckoutSnapshot::build(&cart, &self.config.pricing, customer)
        };

        if let Err(reason) = handoff.hand_off(&snapshot) {
            warn!(error = %reason, "Order handoff failed, cart kept");
            return Err(CheckoutError::Handoff(reason));
        }

        info!(
            lines = snapshot.lines.len(),
            total = %snapshot.totals.total_price,
            "Order handed off"
        );
        self.clear();

        let event = TrackedEvent::new(
            CommerceEvent::purchase(&snapshot),
            self.config.currency_code.clone(),
        );
        Ok(CheckoutReceipt { snapshot, event })
    }
}
