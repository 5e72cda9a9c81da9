//! Object storage for Folio.
//!
//! A bucket is a flat namespace of `/`-separated keys mapping to byte blobs
//! with a content type. Articles live under `articles/` and `drafts/`,
//! uploaded media under `media/`.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`FsObjectStore`] -- a local directory acting as the bucket
//!
//! # Rules
//!
//! 1. Keys are validated by [`validate_key`] before touching any backend.
//! 2. `put` overwrites; there is no versioning.
//! 3. `delete` of a missing key is not an error.
//! 4. `list` returns keys in lexical order.

pub mod error;
pub mod fs;
pub mod key;
pub mod memory;
pub mod signing;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use key::{public_url, validate_key};
pub use memory::InMemoryObjectStore;
pub use signing::{UrlSigner, DEFAULT_READ_URL_TTL_DAYS};
pub use traits::{ObjectInfo, ObjectStore, StoredObject};

/// Content type used when none was recorded for an object.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
