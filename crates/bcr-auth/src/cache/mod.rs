//! Volatile account cache.
//!
//! - [`UserCache`] - the cache contract
//! - [`MemoryCache`] - in-process implementation with per-entry expiry
//! - `RedisCache` - Redis implementation (requires the `redis` feature)
//!
//! Entries are JSON-encoded [`UserRecord`](crate::UserRecord)s keyed by
//! [`cache_key`]. A cache is an optimization only: it never decides
//! whether a password is correct.

mod key;
mod memory;
#[cfg(feature = "redis")]
mod redis;
mod traits;

use std::time::Duration;

use bcr_core::{DEFAULT_CACHE_KEY_PREFIX, DEFAULT_CACHE_TTL_SECS};

pub use key::cache_key;
pub(crate) use key::{decode_entry, encode_entry};
pub use memory::MemoryCache;
#[cfg(feature = "redis")]
pub use redis::RedisCache;
pub use traits::UserCache;

/// Settings shared by every cache implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Lifetime of an entry after `add` or `extend`.
    pub ttl: Duration,
    /// Namespace prepended to every key.
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            key_prefix: DEFAULT_CACHE_KEY_PREFIX.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Default::default()
        }
    }

    /// Builder: set key prefix.
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}
