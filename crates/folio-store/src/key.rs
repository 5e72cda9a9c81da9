//! Object key validation and public URL construction.
//!
//! Valid keys:
//! - Must be non-empty and must not start or end with `/`
//! - Must not contain backslashes, NUL or other control characters
//! - Components between slashes must be non-empty
//! - Components must not start with `.` (reserved for backend bookkeeping,
//!   and rules out `.` and `..`)

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{StoreError, StoreResult};

/// Characters `encodeURIComponent` leaves untouched.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Validate an object key, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use folio_store::validate_key;
///
/// assert!(validate_key("drafts/abc.json").is_ok());
/// assert!(validate_key("media/abc/../../etc/passwd").is_err());
/// ```
pub fn validate_key(key: &str) -> StoreResult<()> {
    let invalid = |reason: &str| StoreError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    if key.is_empty() {
        return Err(invalid("key must not be empty"));
    }
    if key.starts_with('/') || key.ends_with('/') {
        return Err(invalid("must not start or end with '/'"));
    }
    if key.chars().any(|c| c == '\\' || c.is_control()) {
        return Err(invalid("contains a backslash or control character"));
    }
    for component in key.split('/') {
        if component.is_empty() {
            return Err(invalid("path components must not be empty"));
        }
        if component.starts_with('.') {
            return Err(invalid("path components must not start with '.'"));
        }
    }
    Ok(())
}

/// Percent-encode each segment of `key` like `encodeURIComponent`.
pub fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| utf8_percent_encode(segment, COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Public URL of an object: `{base}/{bucket}/{encoded key}`.
pub fn public_url(base_url: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        bucket,
        encode_key(key)
    )
}
