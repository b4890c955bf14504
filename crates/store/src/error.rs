use crowns_core::SessionError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("state encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend failed: {0}")]
    Backend(String),
    /// The stored value could not be read or backed up, so it is never overwritten.
    #[error("stored state under {key} could not be read; refusing to overwrite it")]
    Held { key: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of a scorekeeper operation.
#[derive(Debug, Error)]
pub enum KeeperError {
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The change is applied in memory but could not be written.
    #[error("score not saved: {0}")]
    Persistence(#[from] StoreError),
}

impl KeeperError {
    pub fn is_persistence(&self) -> bool {
        matches!(self, KeeperError::Persistence(_))
    }
}
