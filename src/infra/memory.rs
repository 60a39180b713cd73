use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::services::BlobStorage;

/// In-process blob storage, optionally capped like a browser's local storage.
#[derive(Default)]
pub struct MemoryBlobStorage {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }
}

impl BlobStorage for MemoryBlobStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Read("memory storage lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Write("memory storage lock poisoned".to_string()))?;

        if let Some(quota) = self.quota_bytes {
            let others = entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, data)| existing.len() + data.len())
                .sum::<usize>();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::Write(format!(
                    "quota exceeded ({needed} of {quota} bytes)"
                )));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let storage = MemoryBlobStorage::new();
        assert_eq!(storage.get("tickets_data").unwrap(), None);
    }

    #[test]
    fn quota_rejects_oversized_writes_and_keeps_previous_value() {
        let storage = MemoryBlobStorage::with_quota(16);
        storage.set("k", "small").unwrap();

        let err = storage.set("k", "this value is far too large").unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("small"));
    }
}
