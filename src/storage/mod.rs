use std::path::PathBuf;

use thiserror::Error;

pub mod file;
pub mod memory;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode or decode snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Snapshot is corrupt: {0}")]
    Corrupt(String),
    #[error("Storage lock was poisoned by a panicking writer")]
    Poisoned,
}

/// Key-value blob persistence port.
///
/// Implementations must make `put` atomic: after a failed write the previous
/// blob (or its absence) is still what `get` returns.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    fn put(&mut self, key: &str, blob: &[u8]) -> Result<(), StorageError>;
}
