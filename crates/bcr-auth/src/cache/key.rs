//! Cache key derivation and entry encoding.

use sha2::{Digest, Sha256};

use crate::error::AuthError;
use crate::record::UserRecord;

/// Derive the cache key for a username.
///
/// The username is trimmed and lower-cased, then replaced by its SHA-256
/// hex digest so raw usernames never appear in the key space and every
/// key has the same length.
///
/// # Example
/// ```
/// use bcr_auth::cache::cache_key;
///
/// let a = cache_key("cache:user:", "Alice").unwrap();
/// let b = cache_key("cache:user:", "  alice ").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), "cache:user:".len() + 64);
/// ```
pub fn cache_key(prefix: &str, username: &str) -> Result<String, AuthError> {
    let normalized = username.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(AuthError::validation("username cannot be empty"));
    }
    if normalized.contains(['\r', '\n', '\t', '\0']) {
        return Err(AuthError::validation("username contains invalid characters"));
    }
    let digest = Sha256::digest(normalized.as_bytes());
    Ok(format!("{prefix}{}", hex::encode(digest)))
}

pub(crate) fn encode_entry(record: &UserRecord) -> Result<String, AuthError> {
    serde_json::to_string(record).map_err(AuthError::internal)
}

pub(crate) fn decode_entry(payload: &str) -> Result<UserRecord, serde_json::Error> {
    serde_json::from_str(payload)
}
