//! # Cart View
//!
//! A read-side copy of the cart for one UI fragment (navbar badge, drawer).
//! It never mutates the cart; it re-reads storage whenever a signal says
//! the cart may have changed.
//!
//! ```text
//! Subscription ──sync()──► CartSignal::Changed         → reload
//!                          CartSignal::StorageChanged  → reload (if our key)
//!                          CartSignal::OpenRequested   → open drawer (opt-in)
//! ```

use std::sync::Arc;

use masa_core::{Cart, CartLineItem, CartTotals, PricingPolicy, StoreConfig};
use tracing::trace;

use crate::backend::KeyValueStorage;
use crate::codec::read_cart;
use crate::signal::{CartSignal, Subscription};

/// Badge text shown for counts above this.
const BADGE_CAP: u64 = 9;

/// Navbar badge text: empty when the cart is empty, `"9+"` above nine.
pub fn badge_label(total_item_count: u64) -> String {
    match total_item_count {
        0 => String::new(),
        n if n > BADGE_CAP => format!("{BADGE_CAP}+"),
        n => n.to_string(),
    }
}

/// What one [`CartView::sync`] pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Signals consumed.
    pub signals: usize,
    /// The cart copy was re-read and differs from before.
    pub reloaded: bool,
    /// The drawer was opened by an `open-cart` request.
    pub opened: bool,
}

/// One fragment's view of the cart.
#[derive(Debug)]
pub struct CartView {
    storage: Arc<dyn KeyValueStorage>,
    storage_key: String,
    pricing: PricingPolicy,
    subscription: Subscription,
    cart: Cart,
    open: bool,
    follow_open_requests: bool,
}

impl CartView {
    /// Creates a view and reads the current cart.
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        subscription: Subscription,
        config: &StoreConfig,
    ) -> Self {
        let cart = read_cart(storage.as_ref(), &config.storage_key).unwrap_or_default();
        CartView {
            storage,
            storage_key: config.storage_key.clone(),
            pricing: config.pricing,
            subscription,
            cart,
            open: false,
            follow_open_requests: false,
        }
    }

    /// Makes `open-cart` requests open this view. The drawer does this;
    /// the badge does not.
    pub fn follow_open_requests(mut self) -> Self {
        self.follow_open_requests = true;
        self
    }

    // =========================================================================
    // Signal Handling
    // =========================================================================

    /// Drains pending signals and applies them.
    pub fn sync(&mut self) -> SyncReport {
        let mut report = SyncReport::default();
        while let Some(signal) = self.subscription.try_next() {
            self.apply(&signal, &mut report);
        }
        report
    }

    /// Waits for the next signal and applies it. `None` once the bus is gone.
    pub async fn next_change(&mut self) -> Option<CartSignal> {
        let signal = self.subscription.next().await?;
        let mut report = SyncReport::default();
        self.apply(&signal, &mut report);
        Some(signal)
    }

    fn apply(&mut self, signal: &CartSignal, report: &mut SyncReport) {
        report.signals += 1;
        trace!(signal = signal.name(), "Cart view received signal");

        if signal.invalidates_cart(&self.storage_key) && self.refresh() {
            report.reloaded = true;
        }
        if *signal == CartSignal::OpenRequested && self.follow_open_requests && !self.open {
            self.open = true;
            report.opened = true;
        }
    }

    /// Re-reads storage. Returns true if the copy changed.
    pub fn refresh(&mut self) -> bool {
        match read_cart(self.storage.as_ref(), &self.storage_key) {
            Some(cart) if cart != self.cart => {
                self.cart = cart;
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn items(&self) -> &[CartLineItem] {
        self.cart.items()
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals(&self.pricing)
    }

    pub fn total_item_count(&self) -> u64 {
        self.cart.total_quantity()
    }

    /// Navbar badge text for this view.
    pub fn badge_label(&self) -> String {
        badge_label(self.total_item_count())
    }

    // =========================================================================
    // Drawer State
    // =========================================================================

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use crate::signal::{CartNotifier, SignalBus};
    use crate::store::CartStore;
    use masa_core::ItemSpec;

    fn scarf() -> ItemSpec {
        ItemSpec {
            product_id: "product6".into(),
            color_name: "بيج".into(),
            unit_price: "7.00 د.أ".into(),
            ..Default::default()
        }
    }

    fn setup() -> (CartStore, CartView, CartView) {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let bus = SignalBus::new();
        let config = StoreConfig::default();
        let badge = CartView::new(Arc::clone(&storage), bus.subscribe(), &config);
        let drawer =
            CartView::new(Arc::clone(&storage), bus.subscribe(), &config).follow_open_requests();
        let store = CartStore::open(storage, Arc::new(bus), config);
        (store, badge, drawer)
    }

    #[test]
    fn test_views_follow_the_store() {
        let (store, mut badge, mut drawer) = setup();
        assert_eq!(badge.badge_label(), "");

        store.add_item(scarf());

        let report = badge.sync();
        assert_eq!(report, SyncReport { signals: 2, reloaded: true, opened: false });
        assert_eq!(badge.badge_label(), "1");
        assert!(!badge.is_open());

        let report = drawer.sync();
        assert!(report.opened);
        assert!(drawer.is_open());
        assert_eq!(drawer.items().len(), 1);
        assert_eq!(drawer.totals().total_price.cents(), 700);
    }

    #[test]
    fn test_badge_caps_at_nine() {
        let (store, mut badge, _) = setup();
        let key = scarf().key();
        store.add_item(scarf());

        store.update_quantity(&key, 9);
        badge.sync();
        assert_eq!(badge.badge_label(), "9");

        store.update_quantity(&key, 10);
        badge.sync();
        assert_eq!(badge.badge_label(), "9+");
    }

    #[test]
    fn test_closed_drawer_reopens_on_next_add() {
        let (store, _, mut drawer) = setup();
        store.add_item(scarf());
        drawer.sync();
        drawer.close();

        store.remove_item(&scarf().key());
        assert!(!drawer.sync().opened);
        assert!(!drawer.is_open());
        assert!(drawer.items().is_empty());

        store.add_item(scarf());
        assert!(drawer.sync().opened);
    }

    #[test]
    fn test_foreign_key_is_ignored() {
        let storage = MemoryStorage::new();
        let bus = SignalBus::new();
        let mut view = CartView::new(Arc::new(storage.clone()), bus.subscribe(), &StoreConfig::default());

        storage.set("masa_fashion_cart", r#"[{"productId":"p","price":"1","quantity":1}]"#).unwrap();
        bus.notify(CartSignal::StorageChanged { key: Some("theme".into()) });
        assert!(!view.sync().reloaded);
        assert!(view.items().is_empty());
    }
}
