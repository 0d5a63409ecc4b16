//! # Cart Signals
//!
//! Process-wide notifications that let independent UI fragments (navbar
//! badge, drawer, product page) stay in step without a shared parent.
//!
//! ## Signal Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   CartStore ──notify──► SignalBus (broadcast) ──► Subscription (badge)  │
//! │                              ▲                 └─► Subscription (drawer)│
//! │                              │                                          │
//! │   StorageWatch ──forward_storage_events── StorageChanged                │
//! │   (other tabs)                                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Delivery is fire-and-forget. A notifier can never fail a cart mutation.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, trace, warn};

use crate::backend::StorageWatch;

/// Buffered signals per subscriber before it reports a lag.
const SIGNAL_CAPACITY: usize = 256;

// =============================================================================
// Signals
// =============================================================================

/// A cart notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CartSignal {
    /// The cart contents changed in this tab (`"cart-updated"`).
    Changed,
    /// Something asked for the cart drawer to open (`"open-cart"`).
    OpenRequested,
    /// Another tab wrote to storage (`"storage"`). `key` is `None` when the
    /// changed key is unknown.
    StorageChanged { key: Option<String> },
}

impl CartSignal {
    pub const CART_UPDATED: &'static str = "cart-updated";
    pub const OPEN_CART: &'static str = "open-cart";
    pub const STORAGE: &'static str = "storage";

    /// Event name as the page dispatches it.
    pub fn name(&self) -> &'static str {
        match self {
            CartSignal::Changed => Self::CART_UPDATED,
            CartSignal::OpenRequested => Self::OPEN_CART,
            CartSignal::StorageChanged { .. } => Self::STORAGE,
        }
    }

    /// Whether a listener holding a copy of the cart should re-read it.
    pub fn invalidates_cart(&self, storage_key: &str) -> bool {
        match self {
            CartSignal::Changed => true,
            CartSignal::OpenRequested => false,
            CartSignal::StorageChanged { key } => {
                key.as_deref().map_or(true, |k| k == storage_key)
            }
        }
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// Sink for cart signals.
///
/// Implementations must not block and must not panic; errors are theirs to
/// log.
pub trait CartNotifier: Send + Sync {
    fn notify(&self, signal: CartSignal);
}

/// Notifier that drops every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl CartNotifier for NoopNotifier {
    fn notify(&self, signal: CartSignal) {
        trace!(signal = signal.name(), "Signal dropped");
    }
}

impl<T: CartNotifier + ?Sized> CartNotifier for Arc<T> {
    fn notify(&self, signal: CartSignal) {
        (**self).notify(signal)
    }
}

// =============================================================================
// Signal Bus
// =============================================================================

/// Broadcast hub for one tab's cart signals.
///
/// Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct SignalBus {
    tx: broadcast::Sender<CartSignal>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::with_capacity(SIGNAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        SignalBus { tx }
    }

    /// Registers a listener. It receives signals sent after this call.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CartNotifier for SignalBus {
    fn notify(&self, signal: CartSignal) {
        let name = signal.name();
        match self.tx.send(signal) {
            Ok(receivers) => trace!(signal = name, receivers, "Signal sent"),
            Err(_) => trace!(signal = name, "Signal sent with no listeners"),
        }
    }
}

/// A listener's end of the [`SignalBus`].
///
/// A listener that falls behind receives a single [`CartSignal::Changed`]
/// in place of the signals it missed, which is enough to re-read the cart.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<CartSignal>,
}

impl Subscription {
    /// Returns the next pending signal without waiting.
    pub fn try_next(&mut self) -> Option<CartSignal> {
        match self.rx.try_recv() {
            Ok(signal) => Some(signal),
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "Cart listener lagged");
                Some(CartSignal::Changed)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    /// Waits for the next signal. `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<CartSignal> {
        match self.rx.recv().await {
            Ok(signal) => Some(signal),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Cart listener lagged");
                Some(CartSignal::Changed)
            }
            Err(RecvError::Closed) => None,
        }
    }
}

// =============================================================================
// Cross-Tab Bridge
// =============================================================================

/// Re-publishes other tabs' writes as [`CartSignal::StorageChanged`].
///
/// Runs until the storage backend goes away; spawn it on the runtime.
/// Returns immediately for backends without change notification.
///
/// ## Example
/// ```rust,no_run
/// # async fn demo() {
/// use std::sync::Arc;
/// use masa_storage::{forward_storage_events, KeyValueStorage, MemoryStorage, SignalBus};
///
/// let storage = MemoryStorage::new();
/// let bus = SignalBus::new();
/// tokio::spawn(forward_storage_events(storage.watch(), Arc::new(bus.clone())));
/// # }
/// ```
pub async fn forward_storage_events(mut watch: StorageWatch, notifier: Arc<dyn CartNotifier>) {
    if watch.is_inert() {
        debug!("Storage backend has no change feed, nothing to forward");
        return;
    }

    while let Some(event) = watch.next().await {
        debug!(key = ?event.key, "Storage changed in another tab");
        notifier.notify(CartSignal::StorageChanged { key: event.key });
    }

    debug!("Storage change feed closed");
}
