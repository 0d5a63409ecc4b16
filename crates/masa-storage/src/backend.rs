//! # Key-Value Storage Abstraction
//!
//! The cart persists through a small string-to-string store modelled on the
//! browser's `localStorage`.
//!
//! ## Cross-Tab Events
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tab A handle ──set("masa_fashion_cart")──┐                             │
//! │                                           ▼                             │
//! │                                  shared backing map                     │
//! │                                           │                             │
//! │                    StorageEvent { key } ──┼──► tab B watch  ✔           │
//! │                                           └──► tab A watch  ✘ (own)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! As in the browser, a handle never sees events for its own writes.

use std::fmt;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::debug;

use crate::error::StorageResult;

/// A string key-value store.
///
/// Implementations must be safe to share between threads. Writes from one
/// handle are reported to the [`StorageWatch`]es of *other* handles over the
/// same data, where the backend supports it.
pub trait KeyValueStorage: Send + Sync + fmt::Debug {
    /// Returns the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Subscribes to changes made by other handles.
    fn watch(&self) -> StorageWatch;
}

/// A change made by another handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Changed key. `None` means "anything may have changed" and is emitted
    /// when events were dropped.
    pub key: Option<String>,
}

impl StorageEvent {
    /// Whether a listener interested in `key` should react.
    pub fn concerns(&self, key: &str) -> bool {
        self.key.as_deref().map_or(true, |k| k == key)
    }
}

/// Raw event on a backend's broadcast channel, tagged with the writer.
#[derive(Debug, Clone)]
pub(crate) struct OriginEvent {
    pub origin: u64,
    pub key: String,
}

/// Receiving side of a backend's change feed.
///
/// Backends without change notification hand out an inert watch that
/// never yields.
#[derive(Debug)]
pub struct StorageWatch {
    inner: Option<(broadcast::Receiver<OriginEvent>, u64)>,
}

impl StorageWatch {
    pub(crate) fn new(rx: broadcast::Receiver<OriginEvent>, origin: u64) -> Self {
        StorageWatch {
            inner: Some((rx, origin)),
        }
    }

    /// A watch that never yields.
    pub fn inert() -> Self {
        StorageWatch { inner: None }
    }

    /// Whether this watch can ever yield an event.
    pub fn is_inert(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns the next pending foreign event without waiting.
    pub fn try_next(&mut self) -> Option<StorageEvent> {
        let (rx, origin) = self.inner.as_mut()?;
        loop {
            match rx.try_recv() {
                Ok(event) if event.origin == *origin => continue,
                Ok(event) => return Some(StorageEvent { key: Some(event.key) }),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Storage watch lagged");
                    return Some(StorageEvent { key: None });
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Waits for the next foreign event. Returns `None` once the backend is
    /// gone or the watch is inert.
    pub async fn next(&mut self) -> Option<StorageEvent> {
        let (rx, origin) = self.inner.as_mut()?;
        loop {
            match rx.recv().await {
                Ok(event) if event.origin == *origin => continue,
                Ok(event) => return Some(StorageEvent { key: Some(event.key) }),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Storage watch lagged");
                    return Some(StorageEvent { key: None });
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
