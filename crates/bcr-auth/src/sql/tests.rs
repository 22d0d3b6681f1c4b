//! Tests for the SQL durable store.

use std::sync::Arc;

use crate::record::{Category, UserRecord};
use crate::sql::{DatabaseType, SqlStore, SqlStoreConfig};
use crate::store::UserStore;
use crate::AuthError;

/// Create a test SqlStore with in-memory SQLite.
async fn setup_test_db() -> SqlStore {
    let config = SqlStoreConfig::new("sqlite::memory:")
        .max_connections(1)
        .min_connections(1);

    let store = SqlStore::connect(config).await.expect("Failed to connect");
    store.init_schema().await.expect("Failed to create table");
    store
}

fn record(username: &str, category: Category) -> UserRecord {
    UserRecord {
        username: username.into(),
        password_hash: format!("$2b$04${username}"),
        email: format!("{username}@example.com"),
        category,
    }
}

#[tokio::test]
async fn test_database_type_detection() {
    assert_eq!(
        DatabaseType::from_url("postgres://localhost/db"),
        Some(DatabaseType::PostgreSQL)
    );
    assert_eq!(
        DatabaseType::from_url("postgresql://localhost/db"),
        Some(DatabaseType::PostgreSQL)
    );
    assert_eq!(
        DatabaseType::from_url("mysql://localhost/db"),
        Some(DatabaseType::MySQL)
    );
    assert_eq!(
        DatabaseType::from_url("mariadb://localhost/db"),
        Some(DatabaseType::MySQL)
    );
    assert_eq!(
        DatabaseType::from_url("sqlite::memory:"),
        Some(DatabaseType::SQLite)
    );
    assert_eq!(DatabaseType::from_url("cassandra://localhost"), None);
}

#[tokio::test]
async fn test_connect_rejects_unknown_scheme() {
    let err = SqlStore::connect(SqlStoreConfig::new("memory"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Internal(_)));
}

#[tokio::test]
async fn test_init_schema_is_idempotent() {
    let store = setup_test_db().await;
    store.init_schema().await.unwrap();
    assert_eq!(store.database_type(), DatabaseType::SQLite);
}

#[tokio::test]
async fn test_add_and_get_user() {
    let store = setup_test_db().await;
    store.add_user(&record("alice", Category::Young)).await.unwrap();

    let got = store.get_user("alice").await.unwrap();
    assert_eq!(got, record("alice", Category::Young));
    assert!(store.username_exists("alice").await.unwrap());
    assert!(!store.username_exists("bob").await.unwrap());
}

#[tokio::test]
async fn test_get_missing_user() {
    let store = setup_test_db().await;
    assert_eq!(store.get_user("nobody").await, Err(AuthError::NotFound));
}

#[tokio::test]
async fn test_duplicate_insert_is_already_exists() {
    let store = setup_test_db().await;
    store.add_user(&record("alice", Category::Saver)).await.unwrap();

    let err = store
        .add_user(&record("alice", Category::Spender))
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::AlreadyExists);

    // First write wins
    let got = store.get_user("alice").await.unwrap();
    assert_eq!(got.category, Category::Saver);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_have_one_winner() {
    let store = Arc::new(setup_test_db().await);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.add_user(&record("racer", Category::Saver)).await })
        })
        .collect();

    let mut ok = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => ok += 1,
            Err(AuthError::AlreadyExists) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(conflicts, 7);
}

#[tokio::test]
async fn test_update_user() {
    let store = setup_test_db().await;
    store.add_user(&record("alice", Category::Saver)).await.unwrap();

    let mut changed = record("alice", Category::Spender);
    changed.email = "new@example.com".into();
    changed.password_hash = "$2b$04$rotated".into();
    store.update_user(&changed).await.unwrap();

    assert_eq!(store.get_user("alice").await.unwrap(), changed);
}

#[tokio::test]
async fn test_update_missing_user_does_not_insert() {
    let store = setup_test_db().await;
    let err = store
        .update_user(&record("ghost", Category::Saver))
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::NotFound);
    assert!(!store.username_exists("ghost").await.unwrap());
}

#[tokio::test]
async fn test_delete_user() {
    let store = setup_test_db().await;
    store.add_user(&record("alice", Category::Saver)).await.unwrap();

    store.delete_user("alice").await.unwrap();
    assert_eq!(store.get_user("alice").await, Err(AuthError::NotFound));
    assert_eq!(store.delete_user("alice").await, Err(AuthError::NotFound));
}

#[tokio::test]
async fn test_list_users_sorted() {
    let store = setup_test_db().await;
    store.add_user(&record("carol", Category::Saver)).await.unwrap();
    store.add_user(&record("alice", Category::Young)).await.unwrap();

    let names: Vec<_> = store
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.username)
        .collect();
    assert_eq!(names, ["alice", "carol"]);
}

#[tokio::test]
async fn test_corrupt_category_is_internal() {
    let store = setup_test_db().await;
    sqlx::query(
        "INSERT INTO bcr_users (username, password_hash, email, category) VALUES ('bad', 'h', '', 42)",
    )
    .execute(store.pool())
    .await
    .unwrap();

    assert!(matches!(
        store.get_user("bad").await,
        Err(AuthError::Internal(_))
    ));
}

#[tokio::test]
async fn test_health_and_stats() {
    let store = setup_test_db().await;
    store.health().await.unwrap();

    store.add_user(&record("alice", Category::Saver)).await.unwrap();
    store.add_user(&record("bob", Category::Saver)).await.unwrap();

    let stats = store.stats().await.unwrap();
    assert_eq!(stats["backend"], "sqlite");
    assert_eq!(stats["users"], 2);
    assert_eq!(stats["pool_max"], 1);
}
