//! In-memory durable store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::AuthError;
use crate::record::UserRecord;

use super::traits::{Stats, UserStore};

/// [`UserStore`] over a locked map.
///
/// Each operation holds the lock for a single map access, so insert-if-absent
/// is atomic and concurrent registrations of one username see exactly one
/// winner. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, username: &str) -> Result<UserRecord, AuthError> {
        self.users
            .read()
            .get(username)
            .cloned()
            .ok_or(AuthError::NotFound)
    }

    async fn add_user(&self, record: &UserRecord) -> Result<(), AuthError> {
        match self.users.write().entry(record.username.clone()) {
            Entry::Occupied(_) => Err(AuthError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn update_user(&self, record: &UserRecord) -> Result<(), AuthError> {
        match self.users.write().get_mut(&record.username) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(AuthError::NotFound),
        }
    }

    async fn delete_user(&self, username: &str) -> Result<(), AuthError> {
        self.users
            .write()
            .remove(username)
            .map(|_| ())
            .ok_or(AuthError::NotFound)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.users.read().contains_key(username))
    }

    async fn health(&self) -> Result<(), AuthError> {
        Ok(())
    }

    async fn stats(&self) -> Result<Stats, AuthError> {
        let mut stats = Stats::new();
        stats.insert("backend".into(), self.name().into());
        stats.insert("users".into(), self.len().into());
        Ok(stats)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;

    fn record(username: &str) -> UserRecord {
        UserRecord {
            username: username.into(),
            password_hash: "$2b$04$hash".into(),
            email: format!("{username}@x.com"),
            category: Category::Saver,
        }
    }

    #[tokio::test]
    async fn test_add_get_delete() {
        let store = MemoryStore::new();
        store.add_user(&record("alice")).await.unwrap();
        assert!(store.username_exists("alice").await.unwrap());
        assert_eq!(store.get_user("alice").await.unwrap().email, "alice@x.com");

        store.delete_user("alice").await.unwrap();
        assert_eq!(store.get_user("alice").await, Err(AuthError::NotFound));
        assert_eq!(store.delete_user("alice").await, Err(AuthError::NotFound));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate() {
        let store = MemoryStore::new();
        store.add_user(&record("alice")).await.unwrap();
        assert_eq!(
            store.add_user(&record("alice")).await,
            Err(AuthError::AlreadyExists)
        );
    }

    #[tokio::test]
    async fn test_update_never_inserts() {
        let store = MemoryStore::new();
        assert_eq!(
            store.update_user(&record("ghost")).await,
            Err(AuthError::NotFound)
        );
        assert!(!store.username_exists("ghost").await.unwrap());

        store.add_user(&record("alice")).await.unwrap();
        let mut changed = record("alice");
        changed.category = Category::Young;
        store.update_user(&changed).await.unwrap();
        assert_eq!(
            store.get_user("alice").await.unwrap().category,
            Category::Young
        );
    }

    #[tokio::test]
    async fn test_stats() {
        let store = MemoryStore::new();
        store.add_user(&record("alice")).await.unwrap();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats["users"], 1);
        assert_eq!(stats["backend"], "memory");
    }
}
