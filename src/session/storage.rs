use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::MediHelpError;

/// String key/value store backing the client session
///
/// Implementations must make `remove` atomic: when several callers race to
/// remove the same key, exactly one of them gets the previous value back.
/// A failed write leaves the stored value untouched.
pub trait Storage: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), MediHelpError>;

    /// Remove a value, returning what was stored
    fn remove(&self, key: &str) -> Result<Option<String>, MediHelpError>;
}

/// Process-local storage, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediHelpError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<String>, MediHelpError> {
        Ok(self.entries.lock().remove(key))
    }
}

/// Storage persisted as a flat TOML table, rewritten on every change
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MediHelpError> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), MediHelpError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediHelpError> {
        let mut entries = self.entries.lock();
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<String>, MediHelpError> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            return Ok(None);
        }
        let mut updated = entries.clone();
        let previous = updated.remove(key);
        if let Err(e) = self.persist(&updated) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist storage");
            return Err(e);
        }
        *entries = updated;
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("token"), None);

        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token").as_deref(), Some("abc"));

        assert_eq!(storage.remove("token").unwrap().as_deref(), Some("abc"));
        assert_eq!(storage.remove("token").unwrap(), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("session.toml");

        {
            let storage = FileStorage::open(&path).unwrap();
            storage.set("token", "tok123").unwrap();
            storage.set("freeCredits", "2").unwrap();
        }

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("token").as_deref(), Some("tok123"));
        assert_eq!(reopened.get("freeCredits").as_deref(), Some("2"));
    }

    #[test]
    fn test_file_storage_remove_is_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.toml");

        let storage = FileStorage::open(&path).unwrap();
        storage.set("token", "tok123").unwrap();
        assert!(storage.remove("token").unwrap().is_some());

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("token"), None);
    }

    // Replacing the file with a directory makes every write fail, even as root
    fn break_backing_file(path: &Path) {
        fs::remove_file(path).unwrap();
        fs::create_dir(path).unwrap();
    }

    #[test]
    fn test_failed_remove_keeps_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.toml");
        let storage = FileStorage::open(&path).unwrap();
        storage.set("token", "tok123").unwrap();

        break_backing_file(&path);
        assert!(storage.remove("token").is_err());
        assert_eq!(storage.get("token").as_deref(), Some("tok123"));
    }

    #[test]
    fn test_failed_set_leaves_previous_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.toml");
        let storage = FileStorage::open(&path).unwrap();
        storage.set("token", "old").unwrap();

        break_backing_file(&path);
        assert!(storage.set("token", "new").is_err());
        assert!(storage.set("language", "am").is_err());
        assert_eq!(storage.get("token").as_deref(), Some("old"));
        assert_eq!(storage.get("language"), None);
    }

    #[test]
    fn test_concurrent_remove_has_single_winner() {
        let storage = std::sync::Arc::new(MemoryStorage::new());
        storage.set("token", "abc").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let storage = storage.clone();
                std::thread::spawn(move || storage.remove("token").unwrap().is_some())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|removed| *removed)
            .count();
        assert_eq!(winners, 1);
    }
}
