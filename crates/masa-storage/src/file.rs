//! # File-Backed Storage
//!
//! Persists each key as `<dir>/<key>.json`. Used by the command line shell,
//! where the cart must outlive the process.
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! crash mid-write leaves the previous value readable.
//!
//! Separate processes do not notify each other; [`FileStorage::watch`]
//! hands out an inert watch.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::backend::{KeyValueStorage, StorageWatch};
use crate::error::{StorageError, StorageResult};

/// Directory of JSON files, one per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens storage rooted at `dir`. The directory is created on first
    /// write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

/// Keys become file names: ASCII letters, digits, `_`, `-` and `.` only,
/// and not starting with `.`.
fn validate_key(key: &str) -> StorageResult<()> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
    if key.is_empty() || key.starts_with('.') || !key.chars().all(allowed) {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        debug!(key, bytes = value.len(), path = %path.display(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn watch(&self) -> StorageWatch {
        StorageWatch::inert()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_across_handles() {
        let dir = TempDir::new().unwrap();
        let first = FileStorage::new(dir.path().join("data"));
        assert_eq!(first.get("masa_fashion_cart").unwrap(), None);

        first.set("masa_fashion_cart", "[]").unwrap();

        let second = FileStorage::new(dir.path().join("data"));
        assert_eq!(second.get("masa_fashion_cart").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data/masa_fashion_cart.json").exists());

        second.remove("masa_fashion_cart").unwrap();
        second.remove("masa_fashion_cart").unwrap();
        assert_eq!(first.get("masa_fashion_cart").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        for key in ["", "../escape", "a/b", ".hidden", "سلة"] {
            assert!(
                matches!(storage.set(key, "x"), Err(StorageError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
        assert!(storage.set("staging.cart-v2_1", "x").is_ok());
    }

    #[test]
    fn test_watch_is_inert() {
        let dir = TempDir::new().unwrap();
        assert!(FileStorage::new(dir.path()).watch().is_inert());
    }
}
