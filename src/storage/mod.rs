use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::Result;

/// Keyed whole-value blob storage backing the persisted stores.
///
/// Values are opaque byte blobs written last-write-wins; there is no
/// partial merge. Implementations must make a read after `store` observe
/// the full new value or, on interrupted writes, the previous one.
pub trait Storage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn store(&self, key: &str, value: &[u8]) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// One file per key under a data directory.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.blob_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn store(&self, key: &str, value: &[u8]) -> Result<()> {
        // Write to a sibling temp file first so an interrupted write never
        // leaves a half blob behind the key.
        let path = self.blob_path(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.blob_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-process storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn store(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert!(storage.load("session").unwrap().is_none());

        storage.store("session", b"{}").unwrap();
        assert_eq!(storage.load("session").unwrap(), Some(b"{}".to_vec()));

        // Whole value overwrite.
        storage.store("session", b"{\"a\":1}").unwrap();
        assert_eq!(
            storage.load("session").unwrap(),
            Some(b"{\"a\":1}".to_vec())
        );

        storage.remove("session").unwrap();
        assert!(storage.load("session").unwrap().is_none());

        // Removing an absent key is not an error.
        storage.remove("session").unwrap();
    }

    #[test]
    fn memory_storage_is_isolated_per_instance() {
        let a = MemoryStorage::new();
        let b = MemoryStorage::new();

        a.store("preferences", b"dark").unwrap();
        assert!(b.load("preferences").unwrap().is_none());
    }
}
