//! Redis-backed cache.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::warn;

use crate::error::AuthError;
use crate::record::UserRecord;
use crate::store::Stats;

use super::traits::UserCache;
use super::{CacheConfig, cache_key, decode_entry, encode_entry};

/// [`UserCache`] on a Redis server.
///
/// Uses a multiplexed [`ConnectionManager`] that reconnects on its own;
/// cloning it per call is cheap.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    config: CacheConfig,
}

impl RedisCache {
    /// Connect to `url` (`redis://host:port/db`).
    pub async fn connect(url: &str, config: CacheConfig) -> Result<Self, AuthError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn, config })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    #[inline]
    fn ttl_secs(&self) -> u64 {
        self.config.ttl.as_secs().max(1)
    }
}

#[async_trait]
impl UserCache for RedisCache {
    async fn get(&self, username: &str) -> Result<UserRecord, AuthError> {
        let key = cache_key(&self.config.key_prefix, username)?;
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(&key).await?;
        let payload = payload.ok_or(AuthError::NotFoundInCache)?;

        match decode_entry(&payload) {
            Ok(record) => Ok(record),
            Err(err) => {
                warn!(error = %err, "dropping undecodable cache entry");
                let _: Result<i64, _> = conn.del(&key).await;
                Err(AuthError::NotFoundInCache)
            }
        }
    }

    async fn add(&self, record: &UserRecord) -> Result<(), AuthError> {
        let key = cache_key(&self.config.key_prefix, &record.username)?;
        let payload = encode_entry(record)?;
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(&key, payload, self.ttl_secs()).await?;
        Ok(())
    }

    async fn delete(&self, username: &str) -> Result<(), AuthError> {
        let key = cache_key(&self.config.key_prefix, username)?;
        let mut conn = self.conn.clone();
        let deleted: i64 = conn.del(&key).await?;
        if deleted == 0 {
            return Err(AuthError::NotFoundInCache);
        }
        Ok(())
    }

    async fn exists(&self, username: &str) -> Result<bool, AuthError> {
        let key = cache_key(&self.config.key_prefix, username)?;
        let mut conn = self.conn.clone();
        Ok(conn.exists(&key).await?)
    }

    async fn extend(&self, username: &str) -> Result<(), AuthError> {
        let key = cache_key(&self.config.key_prefix, username)?;
        let mut conn = self.conn.clone();
        let extended: bool = conn.expire(&key, self.ttl_secs() as i64).await?;
        if !extended {
            return Err(AuthError::NotFoundInCache);
        }
        Ok(())
    }

    async fn health(&self) -> Result<(), AuthError> {
        let mut conn = self.conn.clone();
        let _pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn stats(&self) -> Result<Stats, AuthError> {
        let mut conn = self.conn.clone();
        let keys: i64 = redis::cmd("DBSIZE").query_async(&mut conn).await?;
        let mut stats = Stats::new();
        stats.insert("backend".into(), self.name().into());
        stats.insert("keys".into(), keys.into());
        stats.insert("ttl_secs".into(), self.config.ttl.as_secs().into());
        Ok(stats)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

// Debug implementation (don't leak connection details)
impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
