use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{StoreError, StoreResult};
use crate::key::validate_key;
use crate::traits::{ObjectInfo, ObjectStore, StoredObject};
use crate::DEFAULT_CONTENT_TYPE;

/// Directory holding content-type sidecars, relative to the root.
const META_DIR: &str = ".meta";

/// Filesystem-backed object store.
///
/// On-disk layout:
/// ```text
/// <root>/<key>                 object bytes
/// <root>/.meta/<key>.type      content type (UTF-8 text)
/// ```
///
/// Writes go to a hidden, uniquely named temporary file next to the target
/// and are renamed into place, so readers never see a partially written
/// object. Hidden entries are never listed.
pub struct FsObjectStore {
    root: PathBuf,
    bucket: String,
}

impl FsObjectStore {
    /// Open (or create) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>, bucket: impl Into<String>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            bucket: bucket.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join(META_DIR).join(format!("{key}.type"))
    }
}

async fn write_atomic(path: &Path, data: Bytes) -> io::Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic_blocking(&path, &data))
        .await
        .map_err(io::Error::other)?
}

/// Each writer gets its own uniquely named temp file, so concurrent puts to
/// one key race only on the final rename and the last one wins.
fn write_atomic_blocking(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "object path has no parent"))?;
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

async fn read_optional(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn read_content_type(path: &Path) -> String {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| DEFAULT_CONTENT_TYPE.to_string())
}

fn list_blocking(root: &Path, meta_root: &Path, prefix: &str) -> StoreResult<Vec<ObjectInfo>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
        });

    for entry in walker {
        let entry = entry.map_err(|e| StoreError::Backend(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if !key.starts_with(prefix) {
            continue;
        }

        let size = entry
            .metadata()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .len();
        let content_type = read_content_type(&meta_root.join(format!("{key}.type")));
        out.push(ObjectInfo {
            key,
            size,
            content_type,
        });
    }

    out.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(out)
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StoreResult<()> {
        validate_key(key)?;
        debug!(key, bytes = data.len(), "fs store: put");
        write_atomic(&self.object_path(key), data).await?;
        write_atomic(
            &self.meta_path(key),
            Bytes::copy_from_slice(content_type.as_bytes()),
        )
        .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>> {
        validate_key(key)?;
        let Some(data) = read_optional(&self.object_path(key)).await? else {
            return Ok(None);
        };
        let content_type = match read_optional(&self.meta_path(key)).await? {
            Some(raw) => String::from_utf8_lossy(&raw).trim().to_string(),
            None => DEFAULT_CONTENT_TYPE.to_string(),
        };
        Ok(Some(StoredObject {
            key: key.to_string(),
            data: Bytes::from(data),
            content_type,
        }))
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        match tokio::fs::metadata(self.object_path(key)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        debug!(key, "fs store: delete");
        let existed = match tokio::fs::remove_file(self.object_path(key)).await {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        match tokio::fs::remove_file(self.meta_path(key)).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(existed)
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<ObjectInfo>> {
        let root = self.root.clone();
        let meta_root = self.root.join(META_DIR);
        let prefix = prefix.to_string();
        tokio::task::spawn_blocking(move || list_blocking(&root, &meta_root, &prefix))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
    }
}

impl std::fmt::Debug for FsObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsObjectStore")
            .field("root", &self.root)
            .field("bucket", &self.bucket)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> (tempfile::TempDir, FsObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path().join("bucket"), "blogscontent").unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn put_get_roundtrip_with_content_type() {
        let (_dir, store) = open();
        store
            .put("articles/a.json", Bytes::from_static(b"{\"a\":1}"), "application/json")
            .await
            .unwrap();

        let obj = store.get("articles/a.json").await.unwrap().unwrap();
        assert_eq!(&obj.data[..], b"{\"a\":1}");
        assert_eq!(obj.content_type, "application/json");
        assert!(store.root().join("articles/a.json").is_file());
    }

    #[tokio::test]
    async fn missing_object() {
        let (_dir, store) = open();
        assert!(store.get("drafts/none.json").await.unwrap().is_none());
        assert!(!store.exists("drafts/none.json").await.unwrap());
        assert!(!store.delete("drafts/none.json").await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_object_and_sidecar() {
        let (_dir, store) = open();
        store.put("drafts/x.json", Bytes::from_static(b"{}"), "application/json").await.unwrap();
        assert!(store.exists("drafts/x.json").await.unwrap());
        assert!(store.delete("drafts/x.json").await.unwrap());
        assert!(!store.exists("drafts/x.json").await.unwrap());
        assert!(!store.root().join(".meta/drafts/x.json.type").exists());
    }

    #[tokio::test]
    async fn list_skips_hidden_and_other_prefixes() {
        let (_dir, store) = open();
        store.put("drafts/b.json", Bytes::from_static(b"b"), "application/json").await.unwrap();
        store.put("drafts/a.json", Bytes::from_static(b"aa"), "application/json").await.unwrap();
        store.put("articles/c.json", Bytes::from_static(b"c"), "application/json").await.unwrap();
        store.put("media/id/1-p.png", Bytes::from_static(b"png"), "image/png").await.unwrap();

        let drafts = store.list("drafts/").await.unwrap();
        let keys: Vec<&str> = drafts.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["drafts/a.json", "drafts/b.json"]);
        assert_eq!(drafts[0].size, 2);

        let all = store.list("").await.unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|o| !o.key.starts_with('.')));
        let media = store.list("media/").await.unwrap();
        assert_eq!(media[0].content_type, "image/png");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_puts_to_one_key_last_write_wins() {
        let (_dir, store) = open();
        let store = std::sync::Arc::new(store);

        let mut tasks = Vec::new();
        for writer in 0..8u8 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..25 {
                    let body = Bytes::from(vec![writer; 64 * 1024]);
                    store.put("drafts/x.json", body, "application/json").await?;
                }
                StoreResult::Ok(())
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let obj = store.get("drafts/x.json").await.unwrap().unwrap();
        assert_eq!(obj.data.len(), 64 * 1024);
        assert!(obj.data.iter().all(|b| *b == obj.data[0]));

        let listed = store.list("drafts/").await.unwrap();
        assert_eq!(listed.len(), 1);
        let leftovers: Vec<_> = std::fs::read_dir(store.root().join("drafts"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|n| n.to_str() != Some("x.json"))
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    }

    #[tokio::test]
    async fn list_on_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path().join("b"), "b").unwrap();
        std::fs::remove_dir_all(store.root()).unwrap();
        assert!(store.list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn traversal_keys_rejected() {
        let (_dir, store) = open();
        assert!(store
            .put("../outside", Bytes::from_static(b"x"), "text/plain")
            .await
            .is_err());
        assert!(store.get(".meta/drafts/x.json.type").await.is_err());
    }
}
