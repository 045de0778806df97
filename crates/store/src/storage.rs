//! Key-value storage port
//!
//! The template store never touches a storage medium directly. It reads and
//! writes string slots through [`KeyValueStorage`], so it can run over the
//! on-disk [`FileStorage`] in the application and over [`MemoryStorage`] in
//! tests.

use crate::{Result, StoreError};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// String-addressed slot storage
pub trait KeyValueStorage: Send + Sync {
    /// Read a slot; `Ok(None)` when it was never written or was removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a slot
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot; removing an absent slot is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-process storage. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage with pre-populated slots
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            slots: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.slots.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire read lock: {}", e)))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire write lock: {}", e)))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire write lock: {}", e)))?;
        slots.remove(key);
        Ok(())
    }
}

/// Directory-backed storage with one file per slot.
///
/// Writes go through a temporary sibling file and a rename, so readers see
/// either the previous or the new slot contents, never a partial write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Extension of slot files
    pub const EXTENSION: &'static str = "json";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the slot files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`
    pub fn slot_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.{}", key, Self::EXTENSION)))
    }

    fn ensure_directory(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        self.ensure_directory()?;

        let tmp_path = path.with_extension(format!("{}.tmp", Self::EXTENSION));
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keys become file names, so only a conservative character set is allowed
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.get("a").unwrap(), None);

        storage.set("a", "1").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));

        storage.remove("a").unwrap();
        storage.remove("a").unwrap();
        assert_eq!(storage.get("a").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_with_entries() {
        let storage = MemoryStorage::with_entries([("active_template_id", "t1")]);
        assert_eq!(storage.len(), 1);
        assert_eq!(
            storage.get("active_template_id").unwrap().as_deref(),
            Some("t1")
        );
    }

    #[test]
    fn test_file_storage_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("nested").join("data");
        let storage = FileStorage::new(&root);

        assert_eq!(storage.get("invoice_templates").unwrap(), None);
        storage.set("invoice_templates", "[]").unwrap();

        assert!(root.join("invoice_templates.json").exists());
        assert!(!root.join("invoice_templates.json.tmp").exists());
        assert_eq!(
            storage.get("invoice_templates").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_file_storage_overwrite_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        storage.set("active_template_id", "default").unwrap();
        storage.set("active_template_id", "template_1").unwrap();
        assert_eq!(
            storage.get("active_template_id").unwrap().as_deref(),
            Some("template_1")
        );

        storage.remove("active_template_id").unwrap();
        storage.remove("active_template_id").unwrap();
        assert_eq!(storage.get("active_template_id").unwrap(), None);
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(
                matches!(storage.set(key, "x"), Err(StoreError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_shared_storage_through_arc() {
        let storage = Arc::new(MemoryStorage::new());
        let handle = Arc::clone(&storage);
        handle.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }
}
