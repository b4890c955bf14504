use crate::StoreError;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Raw string storage addressed by key.
pub trait StorageBackend {
    /// `Ok(None)` when nothing has been stored under `key` yet.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, body: &str) -> Result<(), StoreError>;
}

/// One JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(body) => Ok(Some(body)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(path, err)),
        }
    }

    fn write(&mut self, key: &str, body: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|err| StoreError::io(&self.dir, err))?;
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|err| StoreError::io(&staging, err))?;
        fs::rename(&staging, &path).map_err(|err| StoreError::io(&path, err))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, body: impl Into<String>) -> Self {
        self.entries.insert(key.into(), body.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, body: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), body.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_backend_missing_key_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = FileBackend::new(dir.path());
        assert!(backend.read("fiveCrownsApp").expect("read").is_none());
    }

    #[test]
    fn file_backend_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut backend = FileBackend::new(dir.path().join("nested"));
        backend.write("k", "{\"a\":1}").expect("first write");
        backend.write("k", "{\"a\":2}").expect("second write");
        assert_eq!(backend.read("k").expect("read").as_deref(), Some("{\"a\":2}"));
        assert!(backend.path_for("k").ends_with("nested/k.json"));
        assert!(!backend.path_for("k").with_extension("json.tmp").exists());
    }

    #[test]
    fn file_backend_reports_unreadable_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("k.json")).expect("dir in the way");
        let backend = FileBackend::new(dir.path());
        assert!(matches!(backend.read("k"), Err(StoreError::Io { .. })));
    }

    #[test]
    fn memory_backend_keeps_keys_apart() {
        let mut backend = MemoryBackend::new().with_entry("a", "1");
        backend.write("b", "2").expect("write");
        assert_eq!(backend.get("a"), Some("1"));
        assert_eq!(backend.get("b"), Some("2"));
        assert_eq!(backend.get("c"), None);
    }
}
