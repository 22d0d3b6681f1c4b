//! Data-access trait for the durable store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AuthError;
use crate::record::UserRecord;

/// Implementation-defined counters reported by `stats()`.
pub type Stats = BTreeMap<String, serde_json::Value>;

/// System of record for user accounts.
///
/// Every error is authoritative: callers never retry and never treat a
/// store failure as a miss. Cancellation is dropping the returned future;
/// an implementation must leave either the whole write or none of it.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a record. [`AuthError::NotFound`] when absent.
    async fn get_user(&self, username: &str) -> Result<UserRecord, AuthError>;

    /// Insert a record, atomically rejecting a taken username with
    /// [`AuthError::AlreadyExists`].
    async fn add_user(&self, record: &UserRecord) -> Result<(), AuthError>;

    /// Replace an existing record. Never inserts; [`AuthError::NotFound`]
    /// when the username is gone.
    async fn update_user(&self, record: &UserRecord) -> Result<(), AuthError>;

    /// Remove a record. [`AuthError::NotFound`] when absent.
    async fn delete_user(&self, username: &str) -> Result<(), AuthError>;

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError>;

    /// [`AuthError::Unavailable`] when the backend cannot serve requests.
    async fn health(&self) -> Result<(), AuthError>;

    async fn stats(&self) -> Result<Stats, AuthError>;

    /// Short backend name for logs and metrics.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<S: UserStore + ?Sized> UserStore for Arc<S> {
    #[inline]
    async fn get_user(&self, username: &str) -> Result<UserRecord, AuthError> {
        (**self).get_user(username).await
    }

    #[inline]
    async fn add_user(&self, record: &UserRecord) -> Result<(), AuthError> {
        (**self).add_user(record).await
    }

    #[inline]
    async fn update_user(&self, record: &UserRecord) -> Result<(), AuthError> {
        (**self).update_user(record).await
    }

    #[inline]
    async fn delete_user(&self, username: &str) -> Result<(), AuthError> {
        (**self).delete_user(username).await
    }

    #[inline]
    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        (**self).username_exists(username).await
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
impl<S: UserStore + ?Sized> UserStore for Box<S> {
    #[inline]
    async fn get_user(&self, username: &str) -> Result<UserRecord, AuthError> {
        (**self).get_user(username).await
    }

    #[inline]
    async fn add_user(&self, record: &UserRecord) -> Result<(), AuthError> {
        (**self).add_user(record).await
    }

    #[inline]
    async fn update_user(&self, record: &UserRecord) -> Result<(), AuthError> {
        (**self).update_user(record).await
    }

    #[inline]
    async fn delete_user(&self, username: &str) -> Result<(), AuthError> {
        (**self).delete_user(username).await
    }

    #[inline]
    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        (**self).username_exists(username).await
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
