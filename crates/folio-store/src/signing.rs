use chrono::{DateTime, Duration, Utc};

use crate::error::{StoreError, StoreResult};
use crate::key::public_url;

/// Lifetime of read URLs handed out for article media.
pub const DEFAULT_READ_URL_TTL_DAYS: i64 = 7;

/// Issues and checks expiring read URLs for bucket objects.
///
/// URL format:
/// ```text
/// {base}/{bucket}/{encoded key}?expires={unix seconds}&signature={hex}
/// ```
///
/// The signature is a keyed BLAKE3 hash over `key` and `expires`, so a URL
/// cannot be re-pointed at another object or have its expiry extended.
#[derive(Clone)]
pub struct UrlSigner {
    key: [u8; 32],
    base_url: String,
    bucket: String,
}

impl UrlSigner {
    pub fn new(key: [u8; 32], base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            key,
            base_url: base_url.into(),
            bucket: bucket.into(),
        }
    }

    /// Build a signer from a 64-character hex key.
    pub fn from_hex(
        key_hex: &str,
        base_url: impl Into<String>,
        bucket: impl Into<String>,
    ) -> StoreResult<Self> {
        let bytes = hex::decode(key_hex.trim()).map_err(|e| StoreError::Signature(e.to_string()))?;
        let key: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            StoreError::Signature(format!("signing key must be 32 bytes, got {}", b.len()))
        })?;
        Ok(Self::new(key, base_url, bucket))
    }

    fn mac(&self, object_key: &str, expires: i64) -> blake3::Hash {
        let message = format!("{object_key}\n{expires}");
        blake3::keyed_hash(&self.key, message.as_bytes())
    }

    /// Hex signature for `object_key` expiring at the unix timestamp `expires`.
    pub fn signature(&self, object_key: &str, expires: i64) -> String {
        self.mac(object_key, expires).to_hex().to_string()
    }

    /// Signed read URL for `object_key`, valid until `expires_at`.
    pub fn sign(&self, object_key: &str, expires_at: DateTime<Utc>) -> String {
        let expires = expires_at.timestamp();
        format!(
            "{}?expires={}&signature={}",
            public_url(&self.base_url, &self.bucket, object_key),
            expires,
            self.signature(object_key, expires)
        )
    }

    /// Signed read URL valid for [`DEFAULT_READ_URL_TTL_DAYS`] from `now`.
    pub fn sign_default(&self, object_key: &str, now: DateTime<Utc>) -> String {
        self.sign(object_key, now + Duration::days(DEFAULT_READ_URL_TTL_DAYS))
    }

    /// Check a signature. Expired URLs and malformed signatures are rejected.
    pub fn verify(&self, object_key: &str, expires: i64, signature: &str, now: DateTime<Utc>) -> bool {
        if now.timestamp() > expires {
            return false;
        }
        let Ok(bytes) = hex::decode(signature) else {
            return false;
        };
        let Ok(bytes) = <[u8; 32]>::try_from(bytes) else {
            return false;
        };
        // blake3::Hash equality is constant-time.
        blake3::Hash::from(bytes) == self.mac(object_key, expires)
    }
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("base_url", &self.base_url)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}
