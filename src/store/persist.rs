//! Storage backends for the record store.
//!
//! Each collection persists as one JSON document under a stable key. The
//! [`Storage`] trait is the seam between the store's bookkeeping and where
//! documents actually live.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Keys of the four persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Members,
    Activities,
    Schedules,
    Settings,
}

impl CollectionKey {
    /// Stable document key, also used as the file stem on disk.
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKey::Members => "members",
            CollectionKey::Activities => "activities",
            CollectionKey::Schedules => "schedules",
            CollectionKey::Settings => "settings",
        }
    }
}

/// Where collection documents are read from and written to.
///
/// `write` must be atomic per document: after a failure the previous
/// document contents are still intact.
pub trait Storage: Send {
    /// Reads the document for `key`, or `None` if it was never written.
    fn read(&self, key: CollectionKey) -> Result<Option<String>, StoreError>;

    /// Durably replaces the document for `key`.
    fn write(&mut self, key: CollectionKey, document: &str) -> Result<(), StoreError>;
}

/// Directory of JSON files, one per collection.
///
/// Human-readable and diff-friendly. Writes go through a sibling temp file
/// and a rename so a crash mid-write cannot corrupt the document.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Opens (creating if needed) a storage directory.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: CollectionKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl Storage for JsonFileStorage {
    fn read(&self, key: CollectionKey) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn write(&mut self, key: CollectionKey, document: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key.as_str()));
        fs::write(&tmp, document)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!("wrote {} ({} bytes)", path.display(), document.len());
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: HashMap<&'static str, String>,
}

impl MemoryStorage {
    /// Creates an empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: CollectionKey) -> Result<Option<String>, StoreError> {
        Ok(self.documents.get(key.as_str()).cloned())
    }

    fn write(&mut self, key: CollectionKey, document: &str) -> Result<(), StoreError> {
        self.documents.insert(key.as_str(), document.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert!(storage.read(CollectionKey::Members).unwrap().is_none());
        storage.write(CollectionKey::Members, "[]").unwrap();
        assert_eq!(
            storage.read(CollectionKey::Members).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = std::env::temp_dir().join("rotaplan-test-file-storage");
        let mut storage = JsonFileStorage::new(&dir).unwrap();
        assert!(storage.read(CollectionKey::Settings).unwrap().is_none());
        storage.write(CollectionKey::Settings, "{}").unwrap();
        assert_eq!(
            storage.read(CollectionKey::Settings).unwrap().as_deref(),
            Some("{}")
        );
        // Overwrite replaces, not appends.
        storage.write(CollectionKey::Settings, "{\"a\":1}").unwrap();
        assert_eq!(
            storage.read(CollectionKey::Settings).unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_keys_map_to_separate_files() {
        let dir = std::env::temp_dir().join("rotaplan-test-file-keys");
        let mut storage = JsonFileStorage::new(&dir).unwrap();
        storage.write(CollectionKey::Members, "[1]").unwrap();
        storage.write(CollectionKey::Activities, "[2]").unwrap();
        assert!(dir.join("members.json").exists());
        assert!(dir.join("activities.json").exists());
        assert_eq!(
            storage.read(CollectionKey::Members).unwrap().as_deref(),
            Some("[1]")
        );
        std::fs::remove_dir_all(&dir).ok();
    }
}
