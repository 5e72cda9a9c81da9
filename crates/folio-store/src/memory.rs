use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreResult;
use crate::key::validate_key;
use crate::traits::{ObjectInfo, ObjectStore, StoredObject};

/// In-memory, BTreeMap-based object store.
///
/// Intended for tests and embedding. Objects are held behind a `RwLock` for
/// safe concurrent access and cloned on read. `Bytes` clones are cheap.
pub struct InMemoryObjectStore {
    bucket: String,
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store named `bucket`.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// All keys in lexical order.
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StoreResult<()> {
        validate_key(key)?;
        let object = StoredObject {
            key: key.to_string(),
            data,
            content_type: content_type.to_string(),
        };
        self.objects
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), object);
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>> {
        validate_key(key)?;
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.contains_key(key))
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        let mut map = self.objects.write().expect("lock poisoned");
        Ok(map.remove(key).is_some())
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<ObjectInfo>> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, obj)| ObjectInfo {
                key: key.clone(),
                size: obj.data.len() as u64,
                content_type: obj.content_type.clone(),
            })
            .collect())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("bucket", &self.bucket)
            .field("object_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn body(s: &str) -> Bytes {
        Bytes::from(s.to_string())
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryObjectStore::new("test");
        store
            .put("drafts/a.json", body("{}"), "application/json")
            .await
            .unwrap();

        let obj = store.get("drafts/a.json").await.unwrap().expect("should exist");
        assert_eq!(obj.data, body("{}"));
        assert_eq!(obj.content_type, "application/json");
        assert_eq!(obj.key, "drafts/a.json");
    }

    #[tokio::test]
    async fn put_overwrites() {
        let store = InMemoryObjectStore::default();
        store.put("k", body("one"), "text/plain").await.unwrap();
        store.put("k", body("two"), "text/plain").await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").await.unwrap().unwrap().data, body("two"));
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = InMemoryObjectStore::default();
        assert!(store.get("nope").await.unwrap().is_none());
        assert!(!store.exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let store = InMemoryObjectStore::default();
        store.put("x", body("1"), "text/plain").await.unwrap();
        assert!(store.delete("x").await.unwrap());
        assert!(!store.exists("x").await.unwrap());
        assert!(!store.delete("x").await.unwrap());
    }

    #[tokio::test]
    async fn invalid_keys_are_rejected() {
        let store = InMemoryObjectStore::default();
        let err = store.put("../x", body("1"), "text/plain").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey { .. }));
        assert!(store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn list_by_prefix() {
        let store = InMemoryObjectStore::default();
        store.put("drafts/b.json", body("bb"), "application/json").await.unwrap();
        store.put("drafts/a.json", body("a"), "application/json").await.unwrap();
        store.put("articles/c.json", body("c"), "application/json").await.unwrap();
        store.put("draftsx/d.json", body("d"), "application/json").await.unwrap();

        let listed = store.list("drafts/").await.unwrap();
        let keys: Vec<&str> = listed.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["drafts/a.json", "drafts/b.json"]);
        assert_eq!(listed[1].size, 2);
    }

    #[tokio::test]
    async fn list_empty_prefix_returns_all() {
        let store = InMemoryObjectStore::default();
        store.put("b", body("1"), "text/plain").await.unwrap();
        store.put("a", body("1"), "text/plain").await.unwrap();
        assert_eq!(store.list("").await.unwrap().len(), 2);
        assert_eq!(store.keys(), vec!["a", "b"]);
    }

    #[test]
    fn debug_format() {
        let store = InMemoryObjectStore::new("blogscontent");
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryObjectStore"));
        assert!(debug.contains("blogscontent"));
    }
}
