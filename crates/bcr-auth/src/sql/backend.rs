//! SQL durable store backend.

use async_trait::async_trait;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};
use tracing::debug;

use crate::error::AuthError;
use crate::record::{Category, UserRecord};
use crate::store::{Stats, UserStore};

use super::config::SqlStoreConfig;
use super::queries;

/// Database type enum for query selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// PostgreSQL database.
    PostgreSQL,
    /// MySQL/MariaDB database.
    MySQL,
    /// SQLite database.
    SQLite,
}

impl DatabaseType {
    /// Detect database type from URL.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Self::PostgreSQL)
        } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Some(Self::MySQL)
        } else if url.starts_with("sqlite:") {
            Some(Self::SQLite)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PostgreSQL => "postgres",
            Self::MySQL => "mysql",
            Self::SQLite => "sqlite",
        }
    }
}

/// SQL-backed [`UserStore`].
///
/// Supports PostgreSQL, MySQL, and SQLite through SQLx.
pub struct SqlStore {
    pool: AnyPool,
    db_type: DatabaseType,
    config: SqlStoreConfig,
}

impl SqlStore {
    /// Connect to database and create the store.
    pub async fn connect(config: SqlStoreConfig) -> Result<Self, AuthError> {
        // Install database drivers for the "any" pool
        sqlx::any::install_default_drivers();

        let db_type = DatabaseType::from_url(&config.database_url)
            .ok_or_else(|| AuthError::internal("unsupported database URL scheme"))?;

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .max_lifetime(config.max_lifetime)
            .idle_timeout(config.idle_timeout)
            .connect(&config.database_url)
            .await?;

        debug!(db = db_type.as_str(), "sql store connected");

        Ok(Self {
            pool,
            db_type,
            config,
        })
    }

    /// Create the accounts table if it does not exist.
    pub async fn init_schema(&self) -> Result<(), AuthError> {
        sqlx::query(queries::CREATE_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All accounts ordered by username.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AuthError> {
        let rows = sqlx::query(queries::LIST_USERS)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::parse_user_row).collect()
    }

    /// Get the connection pool (for advanced usage).
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Get database type.
    pub fn database_type(&self) -> DatabaseType {
        self.db_type
    }

    /// Pick the placeholder dialect for this database.
    #[inline]
    fn pick(&self, pg: &'static str, other: &'static str) -> &'static str {
        match self.db_type {
            DatabaseType::PostgreSQL => pg,
            DatabaseType::MySQL | DatabaseType::SQLite => other,
        }
    }

    fn parse_user_row(row: AnyRow) -> Result<UserRecord, AuthError> {
        let code: i64 = row.try_get("category")?;
        let category = i32::try_from(code)
            .ok()
            .and_then(Category::from_code)
            .ok_or_else(|| AuthError::Internal(format!("stored category {code} out of range")))?;

        Ok(UserRecord {
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            email: row.try_get("email")?,
            category,
        })
    }
}

#[async_trait]
impl UserStore for SqlStore {
    async fn get_user(&self, username: &str) -> Result<UserRecord, AuthError> {
        let query = self.pick(queries::FIND_USER_PG, queries::FIND_USER_MYSQL);
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AuthError::NotFound)?;
        Self::parse_user_row(row)
    }

    async fn add_user(&self, record: &UserRecord) -> Result<(), AuthError> {
        let query = self.pick(queries::INSERT_USER_PG, queries::INSERT_USER_MYSQL);
        sqlx::query(query)
            .bind(&record.username)
            .bind(&record.password_hash)
            .bind(&record.email)
            .bind(i64::from(record.category.code()))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_user(&self, record: &UserRecord) -> Result<(), AuthError> {
        let query = self.pick(queries::UPDATE_USER_PG, queries::UPDATE_USER_MYSQL);
        let result = sqlx::query(query)
            .bind(&record.password_hash)
            .bind(&record.email)
            .bind(i64::from(record.category.code()))
            .bind(&record.username)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> Result<(), AuthError> {
        let query = self.pick(queries::DELETE_USER_PG, queries::DELETE_USER_MYSQL);
        let result = sqlx::query(query)
            .bind(username)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        let query = self.pick(queries::EXISTS_PG, queries::EXISTS_MYSQL);
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn health(&self) -> Result<(), AuthError> {
        sqlx::query(queries::HEALTH)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn stats(&self) -> Result<Stats, AuthError> {
        let row = sqlx::query(queries::COUNT_USERS)
            .fetch_one(&self.pool)
            .await?;
        let total: i64 = row.try_get("total")?;

        let mut stats = Stats::new();
        stats.insert("backend".into(), self.db_type.as_str().into());
        stats.insert("users".into(), total.into());
        stats.insert("pool_size".into(), self.pool.size().into());
        stats.insert("pool_idle".into(), self.pool.num_idle().into());
        stats.insert("pool_max".into(), self.config.max_connections.into());
        Ok(stats)
    }

    fn name(&self) -> &'static str {
        self.db_type.as_str()
    }
}

// Debug implementation (don't leak credentials)
impl std::fmt::Debug for SqlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlStore")
            .field("db_type", &self.db_type)
            .field("max_connections", &self.config.max_connections)
            .finish_non_exhaustive()
    }
}
