//! Data-access trait for the volatile cache.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AuthError;
use crate::record::UserRecord;
use crate::store::Stats;

/// Expiring copy of a subset of durable records.
///
/// Absent entries are reported as [`AuthError::NotFoundInCache`], which
/// callers treat as a miss rather than a failure. An entry that cannot be
/// decoded is deleted and reported as a miss.
#[async_trait]
pub trait UserCache: Send + Sync {
    async fn get(&self, username: &str) -> Result<UserRecord, AuthError>;

    /// Store a record with the configured time-to-live, overwriting any
    /// existing entry. The record carries a hash, never plaintext.
    async fn add(&self, record: &UserRecord) -> Result<(), AuthError>;

    async fn delete(&self, username: &str) -> Result<(), AuthError>;

    async fn exists(&self, username: &str) -> Result<bool, AuthError>;

    /// Reset the time-to-live of an existing entry without rewriting it.
    async fn extend(&self, username: &str) -> Result<(), AuthError>;

    async fn health(&self) -> Result<(), AuthError>;

    async fn stats(&self) -> Result<Stats, AuthError>;

    /// Short backend name for logs and metrics.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<C: UserCache + ?Sized> UserCache for Arc<C> {
    #[inline]
    async fn get(&self, username: &str) -> Result<UserRecord, AuthError> {
        (**self).get(username).await
    }

    #[inline]
    async fn add(&self, record: &UserRecord) -> Result<(), AuthError> {
        (**self).add(record).await
    }

    #[inline]
    async fn delete(&self, username: &str) -> Result<(), AuthError> {
        (**self).delete(username).await
    }

    #[inline]
    async fn exists(&self, username: &str) -> Result<bool, AuthError> {
        (**self).exists(username).await
    }

    #[inline]
    async fn extend(&self, username: &str) -> Result<(), AuthError> {
        (**self).extend(username).await
    }

    #[inline]
    async fn health(&self) -> Result<(), AuthError> {
        (**self).health().await
    }

    #[inline]
    async fn stats(&self) -> Result<Stats, AuthError> {
        (**self).stats().await
    }

    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[async_trait]
impl<C: UserCache + ?Sized> UserCache for Box<C> {
    #[inline]
    async fn get(&self, username: &str) -> Result<UserRecord, AuthError> {
        (**self).get(username).await
    }

    #[inline]
    async fn add(&self, record: &UserRecord) -> Result<(), AuthError> {
        (**self).add(record).await
    }

    #[inline]
    async fn delete(&self, username: &str) -> Result<(), AuthError> {
        (**self).delete(username).await
    }

    #[inline]
    async fn exists(&self, username: &str) -> Result<bool, AuthError> {
        (**self).exists(username).await
    }

    #[inline]
    async fn extend(&self, username: &str) -> Result<(), AuthError> {
        (**self).extend(username).await
    }

    #[inline]
    async fn health(&self) -> Result<(), AuthError> {
        (**self).health().await
    }

    #[inline]
    async fn stats(&self) -> Result<Stats, AuthError> {
        (**self).stats().await
    }

    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }
}
