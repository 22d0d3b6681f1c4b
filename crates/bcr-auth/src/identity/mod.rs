//! Cache-aside account operations over a durable store and a cache.
//!
//! [`IdentityService`] holds no state of its own and takes no locks. Every
//! adapter call is bounded by the service's operation timeout. The durable
//! store is authoritative; the cache is consulted first for reads and
//! written through after every durable write, and is never trusted for the
//! password decision.
//!
//! Cache failures are swallowed only where noted (write-through `add`,
//! `delete` after account removal). A cache write racing a concurrent
//! delete can leave a stale entry behind for at most one cache TTL.

use std::future::Future;
use std::time::Duration;

use bcr_core::DEFAULT_REQUEST_TIMEOUT_MS;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::UserCache;
use crate::error::AuthError;
use crate::hash::PasswordCodec;
use crate::record::{Category, Credentials, NewUser, UserProfile, UserRecord, UserUpdate};
use crate::store::{Stats, UserStore};
use crate::validate::{EmailPolicy, validate_new_user, validate_record};


/// Login, registration, update and deletion of accounts.
pub struct IdentityService<S, C> {
    store: S,
    cache: C,
    codec: PasswordCodec,
    op_timeout: Duration,
}

impl<S: UserStore, C: UserCache> IdentityService<S, C> {
    pub fn new(store: S, cache: C, codec: PasswordCodec) -> Self {
        Self {
            store,
            cache,
            codec,
            op_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Builder: set the deadline applied to each adapter call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn codec(&self) -> &PasswordCodec {
        &self.codec
    }

    /// Verify credentials and return the account's public profile.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// [`AuthError::Unauthorized`].
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile, AuthError> {
        let record = self
            .authenticate(&credentials.username, &credentials.password)
            .await?;
        Ok(record.profile())
    }

    /// Create an account.
    pub async fn register(&self, user: &NewUser) -> Result<UserProfile, AuthError> {
        let category = validate_new_user(user)?;

        // Early rejection only; add_user below is the real uniqueness check.
        if self.cached(&user.username).await?.is_some() {
            return Err(AuthError::AlreadyExists);
        }
        if self
            .bounded(self.store.username_exists(&user.username))
            .await?
        {
            return Err(AuthError::AlreadyExists);
        }

        let record = UserRecord {
            username: user.username.clone(),
            password_hash: self.codec.hash_blocking(&user.password).await?,
            email: user.email.clone(),
            category,
        };
        self.bounded(self.store.add_user(&record)).await?;
        debug!(username = %record.username, "account registered");

        self.write_through(&record).await;
        Ok(record.profile())
    }

    /// Change password, email or category after re-proving the current
    /// password.
    ///
    /// Empty or absent email and out-of-range category keep the current
    /// values. The password is re-hashed on every update.
    pub async fn update(
        &self,
        username: &str,
        password: &str,
        changes: &UserUpdate,
    ) -> Result<UserProfile, AuthError> {
        let current = self.authenticate(username, password).await?;

        let new_password = changes
            .new_password
            .as_deref()
            .filter(|p| !p.is_empty() && *p != password);
        let new_email = changes.email.as_deref().filter(|e| !e.is_empty());
        let new_category = changes.category.and_then(Category::from_code);

        if new_password.is_none() && new_email.is_none() && new_category.is_none() {
            return Err(AuthError::validation("nothing to update"));
        }

        let plaintext = new_password.unwrap_or(password);
        let email = new_email.unwrap_or(&current.email);
        validate_record(username, plaintext, email, EmailPolicy::Optional)?;

        let record = UserRecord {
            username: current.username.clone(),
            password_hash: self.codec.hash_blocking(plaintext).await?,
            email: email.to_string(),
            category: new_category.unwrap_or(current.category),
        };
        self.bounded(self.store.update_user(&record)).await?;
        debug!(
            username = %record.username,
            password_changed = new_password.is_some(),
            "account updated"
        );

        self.write_through(&record).await;
        Ok(record.profile())
    }

    /// Remove an account after re-proving the current password.
    pub async fn delete(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let current = self.authenticate(username, password).await?;
        self.bounded(self.store.delete_user(&current.username))
            .await?;
        debug!(username = %current.username, "account deleted");

        match self.bounded(self.cache.delete(&current.username)).await {
            Ok(()) | Err(AuthError::NotFoundInCache) => {}
            Err(err) => {
                warn!(
                    username = %current.username,
                    error = %err,
                    "cache invalidation failed, entry expires with its ttl"
                );
            }
        }
        Ok(())
    }

    /// Read an account's public profile without a password check.
    ///
    /// For callers that already established identity, e.g. with a token.
    pub async fn profile(&self, username: &str) -> Result<UserProfile, AuthError> {
        match self.cached(username).await {
            Ok(Some(record)) => return Ok(record.profile()),
            Ok(None) => {}
            Err(AuthError::Validation(_)) => return Err(AuthError::NotFound),
            Err(err) => return Err(err),
        }

        let record = self.bounded(self.store.get_user(username)).await?;
        self.write_through(&record).await;
        Ok(record.profile())
    }

    /// Succeeds only when both adapters are healthy.
    pub async fn health(&self) -> Result<(), AuthError> {
        self.bounded(self.store.health()).await?;
        self.bounded(self.cache.health()).await
    }

    /// Adapter counters, keyed `store` and `cache`.
    pub async fn stats(&self) -> Result<Stats, AuthError> {
        let store = self.bounded(self.store.stats()).await?;
        let cache = self.bounded(self.cache.stats()).await?;

        let mut stats = Stats::new();
        stats.insert("store".into(), Value::Object(store.into_iter().collect()));
        stats.insert("cache".into(), Value::Object(cache.into_iter().collect()));
        Ok(stats)
    }

    /// Cache-aside lookup followed by password verification.
    async fn authenticate(&self, username: &str, password: &str) -> Result<UserRecord, AuthError> {
        match self.cached(username).await {
            Ok(Some(record)) => {
                // A cached hash that does not match is final; the store is not asked.
                if !self.codec.verify_blocking(password, &record.password_hash).await? {
                    debug!(username, source = "cache", "password mismatch");
                    return Err(AuthError::Unauthorized);
                }
                debug!(username, source = "cache", "credentials verified");
                return Ok(record);
            }
            Ok(None) => {}
            // No registered username can fail key derivation.
            Err(AuthError::Validation(_)) => return Err(AuthError::Unauthorized),
            Err(err) => return Err(err),
        }

        let record = match self.bounded(self.store.get_user(username)).await {
            Ok(record) => record,
            Err(AuthError::NotFound) => return Err(AuthError::Unauthorized),
            Err(err) => return Err(err),
        };

        if !self.codec.verify_blocking(password, &record.password_hash).await? {
            debug!(username, source = "store", "password mismatch");
            return Err(AuthError::Unauthorized);
        }
        debug!(username, source = "store", "credentials verified");

        self.write_through(&record).await;
        Ok(record)
    }

    /// Cache lookup that only accepts an entry stored for exactly `username`.
    ///
    /// Cache keys fold case and surrounding whitespace while the store does
    /// not, so `alice` and `ALICE` share a key. An entry belonging to another
    /// spelling is a miss.
    async fn cached(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        match self.bounded(self.cache.get(username)).await {
            Ok(record) if record.username == username => Ok(Some(record)),
            Ok(record) => {
                debug!(username, cached = %record.username, "cache entry belongs to another account");
                Ok(None)
            }
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Best-effort cache refresh after a durable read or write.
    async fn write_through(&self, record: &UserRecord) {
        if let Err(err) = self.bounded(self.cache.add(record)).await {
            warn!(
                username = %record.username,
                cache = self.cache.name(),
                error = %err,
                "cache write-through failed"
            );
        }
    }

    /// Run one adapter call under the operation deadline.
    async fn bounded<T, F>(&self, fut: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, AuthError>>,
    {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| AuthError::Timeout)?
    }
}

impl<S, C> std::fmt::Debug for IdentityService<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityService")
            .field("codec", &self.codec)
            .field("op_timeout", &self.op_timeout)
            .finish_non_exhaustive()
    }
}
