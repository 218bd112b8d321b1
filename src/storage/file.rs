use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{BlobStore, StorageError};

/// Stores each key as one file under a directory.
///
/// Writes go to a sibling temp file that is synced and then renamed over the
/// target, so readers never observe a half-written blob.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{file_name}.json"))
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_owned(),
        source,
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_err(&path)(err)),
        }
    }

    fn put(&mut self, key: &str, blob: &[u8]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(io_err(&self.root))?;

        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        let mut file = File::create(&temp_path).map_err(io_err(&temp_path))?;
        file.write_all(blob).map_err(io_err(&temp_path))?;
        file.sync_all().map_err(io_err(&temp_path))?;

        if let Err(err) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(io_err(&path)(err));
        }
        debug!(path = %path.display(), bytes = blob.len(), "blob written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path());
        assert_eq!(store.get("sum-bank:data").unwrap(), None);
    }

    #[test]
    fn write_and_read_back() {
        let dir = TempDir::new().unwrap();
        let mut store = FileBlobStore::new(dir.path().join("nested"));
        store.put("sum-bank:data", br#"{"a":1}"#).unwrap();

        assert_eq!(
            store.get("sum-bank:data").unwrap().as_deref(),
            Some(&br#"{"a":1}"#[..])
        );
        let path = store.path_for("sum-bank:data");
        assert_eq!(path.file_name().unwrap(), "sum-bank_data.json");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn unwritable_root_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"file in the way").unwrap();

        let mut store = FileBlobStore::new(&blocker);
        let err = store.put("k", b"x").unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
