//! End-to-end cart behaviour: persistence, totals, signals and cross-tab
//! synchronization.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use masa_core::{Catalog, ColorChoice, ItemSpec, Selection, StoreConfig};
use masa_storage::{
    forward_storage_events, CartNotifier, CartSignal, CartStore, CartView, FileStorage,
    KeyValueStorage, MemoryStorage, NoopNotifier, SignalBus,
};
use tempfile::TempDir;

const KEY: &str = "masa_fashion_cart";

fn resolve(product: &str, color: usize, size: Option<&str>) -> ItemSpec {
    let mut selection = Selection::new(product, ColorChoice::Index(color));
    if let Some(size) = size {
        selection = selection.with_size(size);
    }
    Catalog::builtin().resolve(&selection).unwrap()
}

fn memory_store() -> (CartStore, MemoryStorage) {
    let storage = MemoryStorage::new();
    let store = CartStore::open(
        Arc::new(storage.clone()),
        Arc::new(NoopNotifier),
        StoreConfig::default(),
    );
    (store, storage)
}

#[test]
fn test_repeated_adds_merge_into_one_line() {
    let (store, _) = memory_store();
    for _ in 0..3 {
        store.add_item(resolve("product1", 0, Some("1")));
    }
    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 3);

    // A different size is a different line.
    store.add_item(resolve("product1", 0, Some("2")));
    assert_eq!(store.items().len(), 2);
}

#[test]
fn test_add_then_remove_leaves_empty_cart() {
    let (store, storage) = memory_store();
    let spec = resolve("product2", 0, None);
    store.add_item(spec.clone());
    assert!(store.remove_item(&spec.key()));

    assert!(store.items().is_empty());
    assert_eq!(storage.get(KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_zero_or_negative_quantity_removes() {
    let (store, _) = memory_store();
    let a = resolve("product1", 0, Some("1"));
    let b = resolve("product2", 0, None);
    store.add_item(a.clone());
    store.add_item(b.clone());

    assert!(store.update_quantity(&a.key(), 0));
    assert!(store.update_quantity(&b.key(), -1));
    assert!(store.items().is_empty());
}

#[test]
fn test_totals_follow_multi_item_rule() {
    let (store, _) = memory_store();
    let abaya = resolve("product1", 0, Some("1"));

    store.add_item(abaya.clone());
    assert_eq!(store.totals().total_price.cents(), 1500);

    store.add_item(resolve("product2", 0, None));
    let totals = store.totals();
    assert_eq!(totals.total_price.cents(), 3000);
    assert_eq!(totals.delivery_fee.cents(), 200);
    assert!(totals.multi_item_applied);

    store.remove_item(&resolve("product2", 0, None).key());
    let totals = store.totals();
    assert_eq!(totals.total_price.cents(), 1500);
    assert!(totals.delivery_fee.is_zero());
}

#[test]
fn test_cart_survives_restart_on_disk() {
    let dir = TempDir::new().unwrap();
    let open = || {
        CartStore::open(
            Arc::new(FileStorage::new(dir.path())),
            Arc::new(NoopNotifier),
            StoreConfig::default(),
        )
    };

    let first = open();
    first.add_item(resolve("product3", 1, Some("2")));
    first.add_item(resolve("product3", 1, Some("2")));
    let before = first.snapshot();
    drop(first);

    let second = open();
    assert_eq!(second.snapshot(), before);
    assert_eq!(second.items()[0].quantity, 2);
}

#[test]
fn test_corrupt_storage_starts_empty_and_recovers() {
    let storage = MemoryStorage::new();
    storage.set(KEY, "this is not a cart").unwrap();

    let store = CartStore::open(
        Arc::new(storage.clone()),
        Arc::new(NoopNotifier),
        StoreConfig::default(),
    );
    assert!(store.items().is_empty());

    store.add_item(resolve("product2", 0, None));
    assert!(storage.get(KEY).unwrap().unwrap().starts_with('['));
}

#[test]
fn test_second_fragment_sees_change_after_signal() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    let bus = SignalBus::new();
    let config = StoreConfig::default();

    let mut badge = CartView::new(Arc::clone(&storage), bus.subscribe(), &config);
    let product_page = CartStore::open(storage, Arc::new(bus), config);

    product_page.add_item(resolve("product2", 1, None));
    assert_eq!(badge.badge_label(), "", "view only updates on sync");

    let report = badge.sync();
    assert!(report.reloaded);
    assert_eq!(badge.badge_label(), "1");
}

/// Notifier that only counts what it receives.
struct CountingNotifier {
    calls: AtomicUsize,
}

impl CartNotifier for CountingNotifier {
    fn notify(&self, _signal: CartSignal) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_listeners_do_not_affect_mutations() {
    let notifier = Arc::new(CountingNotifier {
        calls: AtomicUsize::new(0),
    });
    let storage = MemoryStorage::new();
    let store = CartStore::open(
        Arc::new(storage.clone()),
        notifier.clone(),
        StoreConfig::default(),
    );

    let receipt = store.add_item(resolve("product4", 0, Some("1")));
    assert_eq!(receipt.item.quantity, 1);
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 2);

    // Failing writes are swallowed too.
    let full = MemoryStorage::with_quota(1);
    let store = CartStore::open(Arc::new(full), notifier.clone(), StoreConfig::default());
    store.add_item(resolve("product4", 0, Some("1")));
    assert_eq!(store.items().len(), 1);
}

#[tokio::test]
async fn test_other_tab_write_reaches_this_tab() {
    let tab_a = MemoryStorage::new();
    let tab_b = tab_a.open_tab();

    let bus_b = SignalBus::new();
    let mut drawer_b = CartView::new(Arc::new(tab_b.clone()), bus_b.subscribe(), &StoreConfig::default());
    tokio::spawn(forward_storage_events(tab_b.watch(), Arc::new(bus_b.clone())));

    let store_a = CartStore::open(Arc::new(tab_a), Arc::new(SignalBus::new()), StoreConfig::default());
    store_a.add_item(resolve("product2", 0, None));

    let signal = tokio::time::timeout(Duration::from_secs(2), drawer_b.next_change())
        .await
        .expect("storage event not forwarded")
        .expect("bus closed");

    assert_eq!(signal, CartSignal::StorageChanged { key: Some(KEY.to_string()) });
    assert_eq!(drawer_b.items().len(), 1);
    // Another tab's add does not open this tab's drawer.
    assert!(!drawer_b.is_open());
}

#[tokio::test]
async fn test_writer_tab_gets_no_storage_event() {
    let tab_a = MemoryStorage::new();
    let bus_a = SignalBus::new();
    let mut sub = bus_a.subscribe();
    tokio::spawn(forward_storage_events(tab_a.watch(), Arc::new(bus_a.clone())));

    let store = CartStore::open(Arc::new(tab_a), Arc::new(bus_a), StoreConfig::default());
    store.add_item(resolve("product2", 0, None));

    tokio::time::sleep(Duration::from_millis(50)).await;
    let signals: Vec<_> = std::iter::from_fn(|| sub.try_next()).collect();
    assert_eq!(signals, vec![CartSignal::Changed, CartSignal::OpenRequested]);
}
