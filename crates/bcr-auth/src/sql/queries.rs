//! SQL queries for different databases.

/// Table definition, portable across all supported databases.
pub const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS bcr_users (
    username VARCHAR(20) PRIMARY KEY,
    password_hash VARCHAR(72) NOT NULL,
    email VARCHAR(254) NOT NULL DEFAULT '',
    category BIGINT NOT NULL DEFAULT 2
)
"#;

pub const HEALTH: &str = "SELECT 1";

pub const COUNT_USERS: &str = "SELECT COUNT(*) AS total FROM bcr_users";

pub const LIST_USERS: &str =
    "SELECT username, password_hash, email, category FROM bcr_users ORDER BY username";

/// Query to find a user by username (PostgreSQL).
pub const FIND_USER_PG: &str = r#"
SELECT username, password_hash, email, category
FROM bcr_users
WHERE username = $1
"#;

/// Query to find a user by username (MySQL/SQLite).
pub const FIND_USER_MYSQL: &str = r#"
SELECT username, password_hash, email, category
FROM bcr_users
WHERE username = ?
"#;

pub const EXISTS_PG: &str = "SELECT 1 AS present FROM bcr_users WHERE username = $1";
pub const EXISTS_MYSQL: &str = "SELECT 1 AS present FROM bcr_users WHERE username = ?";

pub const INSERT_USER_PG: &str = r#"
INSERT INTO bcr_users (username, password_hash, email, category)
VALUES ($1, $2, $3, $4)
"#;

pub const INSERT_USER_MYSQL: &str = r#"
INSERT INTO bcr_users (username, password_hash, email, category)
VALUES (?, ?, ?, ?)
"#;

pub const UPDATE_USER_PG: &str = r#"
UPDATE bcr_users
SET password_hash = $1, email = $2, category = $3
WHERE username = $4
"#;

pub const UPDATE_USER_MYSQL: &str = r#"
UPDATE bcr_users
SET password_hash = ?, email = ?, category = ?
WHERE username = ?
"#;

pub const DELETE_USER_PG: &str = "DELETE FROM bcr_users WHERE username = $1";
pub const DELETE_USER_MYSQL: &str = "DELETE FROM bcr_users WHERE username = ?";
