use std::collections::HashMap;

use super::{BlobStore, StorageError};

/// Volatile store, used for tests and one-shot sessions.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBlobStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl BlobStore for InMemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, blob: &[u8]) -> Result<(), StorageError> {
        self.blobs.insert(key.to_owned(), blob.to_vec());
        Ok(())
    }
}
