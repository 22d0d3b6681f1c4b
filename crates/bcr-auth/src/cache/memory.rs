//! In-memory cache with per-entry expiry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::warn;

use crate::error::AuthError;
use crate::record::UserRecord;
use crate::store::Stats;

use super::traits::UserCache;
use super::{CacheConfig, cache_key, decode_entry, encode_entry};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheEntry {
    payload: String,
    expires_at: Instant,
}

impl CacheEntry {
    #[inline]
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// [`UserCache`] kept in process memory.
///
/// Entries expire `ttl` after their last `add`/`extend`. Expired entries
/// are invisible immediately and dropped lazily on access or by
/// [`purge_expired`](Self::purge_expired).
#[derive(Debug)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Number of stored entries, including ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Store a raw payload under a username's key, bypassing encoding.
    #[cfg(test)]
    pub(crate) fn insert_raw(&self, username: &str, payload: &str) {
        let key = cache_key(&self.config.key_prefix, username).unwrap();
        self.entries.write().insert(
            key,
            CacheEntry {
                payload: payload.to_string(),
                expires_at: Instant::now() + self.config.ttl,
            },
        );
    }

    /// Remove `key` only if it still holds `seen`.
    ///
    /// A dead entry is spotted under the read lock and evicted under the
    /// write lock; an `add` that lands in between must survive.
    fn evict_if_unchanged(&self, key: &str, seen: &CacheEntry) -> bool {
        let mut entries = self.entries.write();
        if entries.get(key) == Some(seen) {
            entries.remove(key);
            true
        } else {
            false
        }
    }

    fn miss(&self) -> AuthError {
        self.misses.fetch_add(1, Ordering::Relaxed);
        AuthError::NotFoundInCache
    }
}

#[async_trait]
impl UserCache for MemoryCache {
    async fn get(&self, username: &str) -> Result<UserRecord, AuthError> {
        let key = cache_key(&self.config.key_prefix, username)?;
        let now = Instant::now();

        let seen = match self.entries.read().get(&key) {
            Some(entry) => entry.clone(),
            None => return Err(self.miss()),
        };

        if !seen.is_live(now) {
            self.evict_if_unchanged(&key, &seen);
            return Err(self.miss());
        }

        match decode_entry(&seen.payload) {
            Ok(record) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(record)
            }
            Err(err) => {
                warn!(error = %err, "dropping undecodable cache entry");
                self.evict_if_unchanged(&key, &seen);
                Err(self.miss())
            }
        }
    }

    async fn add(&self, record: &UserRecord) -> Result<(), AuthError> {
        let key = cache_key(&self.config.key_prefix, &record.username)?;
        let payload = encode_entry(record)?;
        self.entries.write().insert(
            key,
            CacheEntry {
                payload,
                expires_at: Instant::now() + self.config.ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, username: &str) -> Result<(), AuthError> {
        let key = cache_key(&self.config.key_prefix, username)?;
        match self.entries.write().remove(&key) {
            Some(entry) if entry.is_live(Instant::now()) => Ok(()),
            _ => Err(AuthError::NotFoundInCache),
        }
    }

    async fn exists(&self, username: &str) -> Result<bool, AuthError> {
        let key = cache_key(&self.config.key_prefix, username)?;
        let now = Instant::now();
        Ok(self
            .entries
            .read()
            .get(&key)
            .is_some_and(|entry| entry.is_live(now)))
    }

    async fn extend(&self, username: &str) -> Result<(), AuthError> {
        let key = cache_key(&self.config.key_prefix, username)?;
        let now = Instant::now();
        match self.entries.write().get_mut(&key) {
            Some(entry) if entry.is_live(now) => {
                entry.expires_at = now + self.config.ttl;
                Ok(())
            }
            _ => Err(AuthError::NotFoundInCache),
        }
    }

    async fn health(&self) -> Result<(), AuthError> {
        Ok(())
    }

    async fn stats(&self) -> Result<Stats, AuthError> {
        let mut stats = Stats::new();
        stats.insert("backend".into(), self.name().into());
        stats.insert("entries".into(), self.len().into());
        stats.insert("hits".into(), self.hits.load(Ordering::Relaxed).into());
        stats.insert("misses".into(), self.misses.load(Ordering::Relaxed).into());
        stats.insert("ttl_secs".into(), self.config.ttl.as_secs().into());
        Ok(stats)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
