use crate::{FileBackend, PersistentStore};
use crowns_core::PERSIST_KEY;
use std::ffi::OsString;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "CROWNS_DATA_DIR";

/// Where the scorekeeper keeps its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// `None` runs without persistence.
    pub data_dir: Option<PathBuf>,
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            key: PERSIST_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var_os(DATA_DIR_ENV),
            std::env::var_os("HOME"),
        )
    }

    /// `data_dir` wins; otherwise `<home>/.crowns`.
    pub fn from_vars(data_dir: Option<OsString>, home: Option<OsString>) -> Self {
        let data_dir = data_dir
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                home.filter(|home| !home.is_empty())
                    .map(|home| PathBuf::from(home).join(".crowns"))
            });
        Self {
            data_dir,
            ..Self::default()
        }
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn state_path(&self) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| FileBackend::new(dir).path_for(&self.key))
    }

    pub fn open_store(&self) -> PersistentStore<FileBackend> {
        match &self.data_dir {
            Some(dir) => PersistentStore::new(FileBackend::new(dir)),
            None => PersistentStore::without_backend(),
        }
    }
}
