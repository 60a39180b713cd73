use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::services::BlobStorage;

/// Blob storage backed by one `<key>.json` file per key in a directory.
pub struct FileBlobStorage {
    root: PathBuf,
}

impl FileBlobStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::Read(format!("invalid storage key '{key}'")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl BlobStorage for FileBlobStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Read(format!("{}: {err}", path.display()))),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self
            .path_for(key)
            .map_err(|err| StoreError::Write(err.to_string()))?;
        let write_err = |err: std::io::Error| StoreError::Write(format!("{}: {err}", path.display()));

        fs::create_dir_all(&self.root).map_err(write_err)?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value).map_err(write_err)?;
        fs::rename(&staging, &path).map_err(write_err)?;
        Ok(())
    }
}
