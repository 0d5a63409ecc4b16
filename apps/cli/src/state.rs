//! # Application State
//!
//! Everything a command needs, built once per invocation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         AppState                                        │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐    │
//! │  │    CartStore     │ │     Catalog      │ │     data_dir         │    │
//! │  │                  │ │                  │ │                      │    │
//! │  │  FileStorage     │ │  built-in        │ │  masa_fashion_cart   │    │
//! │  │  LogNotifier     │ │  products        │ │  .json + orders/     │    │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use masa_core::{Catalog, StoreConfig};
use masa_storage::{CartNotifier, CartSignal, CartStore, FileStorage};
use tracing::{debug, info};

use crate::error::ApiError;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MASA_DATA_DIR";

/// Shared state for one command invocation.
#[derive(Debug)]
pub struct AppState {
    pub store: CartStore,
    pub catalog: Catalog,
    data_dir: PathBuf,
}

impl AppState {
    /// Opens the cart persisted under `data_dir`.
    pub fn open(data_dir: impl Into<PathBuf>, config: StoreConfig) -> Self {
        let data_dir = data_dir.into();
        let storage = FileStorage::new(&data_dir);
        let store = CartStore::open(Arc::new(storage), Arc::new(LogNotifier), config);
        AppState {
            store,
            catalog: Catalog::builtin(),
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &StoreConfig {
        self.store.config()
    }

    /// Where handed-off orders are recorded.
    pub fn orders_dir(&self) -> PathBuf {
        self.data_dir.join("orders")
    }
}

/// A single CLI run has no other fragments to wake, so signals are only
/// logged.
#[derive(Debug, Clone, Copy)]
pub struct LogNotifier;

impl CartNotifier for LogNotifier {
    fn notify(&self, signal: CartSignal) {
        debug!(signal = signal.name(), "Cart signal");
    }
}

/// Determines the data directory.
///
/// ## Resolution Order
/// 1. `--data-dir` flag
/// 2. `MASA_DATA_DIR` environment variable
/// 3. Platform data directory:
///    - **macOS**: `~/Library/Application Support/com.masa.fashion`
///    - **Windows**: `%APPDATA%\masa\fashion\data`
///    - **Linux**: `~/.local/share/fashion`
pub fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf, ApiError> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let proj_dirs = ProjectDirs::from("com", "masa", "fashion")
        .ok_or_else(|| ApiError::internal("Could not determine data directory"))?;
    let dir = proj_dirs.data_dir().to_path_buf();
    info!(data_dir = %dir.display(), "Using platform data directory");
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flag_wins() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/masa-test"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/masa-test"));
    }

    #[test]
    fn test_state_paths() {
        let tmp = TempDir::new().unwrap();
        let state = AppState::open(tmp.path(), StoreConfig::default());
        assert_eq!(state.data_dir(), tmp.path());
        assert_eq!(state.orders_dir(), tmp.path().join("orders"));
        assert!(state.store.items().is_empty());
        assert_eq!(state.catalog.len(), 6);
    }
}
