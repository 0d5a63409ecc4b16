//! # In-Memory Storage
//!
//! A `localStorage` stand-in. Every handle opened with
//! [`MemoryStorage::open_tab`] shares one backing map, like the tabs of a
//! browser share one origin's storage, and each gets its own change feed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use tracing::trace;

use crate::backend::{KeyValueStorage, OriginEvent, StorageWatch};
use crate::error::{StorageError, StorageResult};

/// Buffered change events per watch before it reports a lag.
const EVENT_CAPACITY: usize = 256;

#[derive(Debug)]
struct Shared {
    data: Mutex<HashMap<String, String>>,
    events: broadcast::Sender<OriginEvent>,
    next_origin: AtomicU64,
    /// Total bytes (keys plus values) the map may hold.
    quota: Option<usize>,
}

/// Thread-safe in-memory key-value store.
///
/// Cloning yields another handle for the *same* tab. Use
/// [`open_tab`](Self::open_tab) for a handle that observes this one.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    shared: Arc<Shared>,
    origin: u64,
}

impl MemoryStorage {
    /// Creates an empty store without a size limit.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Creates an empty store that rejects writes once keys plus values
    /// would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self::build(Some(bytes))
    }

    fn build(quota: Option<usize>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        MemoryStorage {
            shared: Arc::new(Shared {
                data: Mutex::new(HashMap::new()),
                events,
                next_origin: AtomicU64::new(1),
                quota,
            }),
            origin: 0,
        }
    }

    /// Opens another handle over the same data, as a second browser tab.
    pub fn open_tab(&self) -> Self {
        MemoryStorage {
            shared: Arc::clone(&self.shared),
            origin: self.shared.next_origin.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.shared.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, key: &str) {
        // No subscribers is fine: nobody else is watching.
        let sent = self.shared.events.send(OriginEvent {
            origin: self.origin,
            key: key.to_string(),
        });
        if sent.is_err() {
            trace!(key, "No storage watchers");
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        {
            let mut data = self.lock();
            if let Some(quota) = self.shared.quota {
                let others: usize = data
                    .iter()
                    .filter(|(k, _)| k.as_str() != key)
                    .map(|(k, v)| k.len() + v.len())
                    .sum();
                let needed = others + key.len() + value.len();
                if needed > quota {
                    return Err(StorageError::QuotaExceeded {
                        key: key.to_string(),
                        needed,
                        quota,
                    });
                }
            }
            data.insert(key.to_string(), value.to_string());
        }
        self.publish(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let removed = self.lock().remove(key).is_some();
        if removed {
            self.publish(key);
        }
        Ok(())
    }

    fn watch(&self) -> StorageWatch {
        StorageWatch::new(self.shared.events.subscribe(), self.origin)
    }
}
