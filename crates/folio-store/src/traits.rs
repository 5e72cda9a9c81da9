use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreResult;

/// An object read back from a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub data: Bytes,
    pub content_type: String,
}

/// Listing entry for an object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
    pub content_type: String,
}

/// Bucket-style object store.
///
/// All implementations must satisfy these invariants:
/// - Keys are validated with [`crate::validate_key`] on every call.
/// - `put` replaces any existing object at the key.
/// - `list` returns entries sorted by key.
/// - All I/O errors are propagated, except "not found", which is reported
///   through the return value.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket, used when building public URLs.
    fn bucket(&self) -> &str;

    /// Create or overwrite the object at `key`.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StoreResult<()>;

    /// Read an object. Returns `Ok(None)` if it does not exist.
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>>;

    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Delete an object. Returns `true` if the object existed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// List every object whose key starts with `prefix`.
    async fn list(&self, prefix: &str) -> StoreResult<Vec<ObjectInfo>>;
}
