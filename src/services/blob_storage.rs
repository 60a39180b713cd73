use crate::error::StoreResult;

/// Key-value blob store holding serialized documents (the local-storage seam).
///
/// Implementations do no locking beyond what a single call needs; the ticket
/// store is the only code expected to read or write through it.
pub trait BlobStorage: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}
