//! # masa-storage: Persistence & Synchronization Layer
//!
//! Keeps the cart in a `localStorage`-style key-value store and keeps every
//! cart surface in step with it.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         masa-storage                                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         CartStore                               │   │
//! │  │   add_item • remove_item • update_quantity • clear • checkout   │   │
//! │  └───────────────┬──────────────────────────────────┬──────────────┘   │
//! │                  │ write-through                    │ notify           │
//! │                  ▼                                  ▼                  │
//! │  ┌───────────────────────────────┐  ┌───────────────────────────────┐  │
//! │  │  KeyValueStorage              │  │  SignalBus                    │  │
//! │  │  MemoryStorage │ FileStorage  │  │  cart-updated • open-cart     │  │
//! │  └───────────────┬───────────────┘  └───────────────┬───────────────┘  │
//! │                  │ StorageWatch (other tabs)        │ Subscription     │
//! │                  └──► forward_storage_events ───────┤                  │
//! │                                                     ▼                  │
//! │                                          CartView (badge, drawer)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use masa_core::{Catalog, ColorChoice, Selection, StoreConfig};
//! use masa_storage::{CartStore, CartView, MemoryStorage, SignalBus};
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let bus = SignalBus::new();
//! let config = StoreConfig::default();
//!
//! let mut badge = CartView::new(storage.clone(), bus.subscribe(), &config);
//! let store = CartStore::open(storage, Arc::new(bus), config);
//!
//! let spec = Catalog::builtin()
//!     .resolve(&Selection::new("product2", ColorChoice::Index(0)))
//!     .unwrap();
//! store.add_item(spec);
//!
//! badge.sync();
//! assert_eq!(badge.badge_label(), "1");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod codec;
pub mod error;
pub mod file;
pub mod memory;
pub mod signal;
pub mod store;
pub mod view;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{KeyValueStorage, StorageEvent, StorageWatch};
pub use codec::{decode_cart, encode_cart};
pub use error::{CheckoutError, StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use signal::{forward_storage_events, CartNotifier, CartSignal, NoopNotifier, SignalBus, Subscription};
pub use store::{AddReceipt, CartStore, CheckoutReceipt, OrderHandoff};
pub use view::{badge_label, CartView, SyncReport};
