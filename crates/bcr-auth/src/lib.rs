//! Account storage, credential verification and session tokens for bcr.
//!
//! The [`IdentityService`] runs login, registration, update and deletion as
//! cache-aside transactions over a [`UserStore`] (system of record) and a
//! [`UserCache`] (expiring copy). [`TokenIssuer`] signs the session tokens
//! handed out after a successful login.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use bcr_auth::cache::{CacheConfig, MemoryCache};
//! use bcr_auth::{Credentials, IdentityService, MemoryStore, NewUser, PasswordCodec, TokenIssuer};
//!
//! # async fn example() -> Result<(), bcr_auth::AuthError> {
//! let service = IdentityService::new(
//!     MemoryStore::new(),
//!     MemoryCache::new(CacheConfig::new(Duration::from_secs(60))),
//!     PasswordCodec::new(10)?,
//! );
//! service
//!     .register(&NewUser::new("alice", "Secret123", "alice@example.com", None))
//!     .await?;
//!
//! let profile = service.login(&Credentials::new("alice", "Secret123")).await?;
//! let issuer = TokenIssuer::new(b"a-signing-secret-of-32-bytes-min")?;
//! let token = issuer.issue(&profile.username)?;
//! assert_eq!(issuer.validate(&token)?, "alice");
//! # Ok(())
//! # }
//! ```

pub mod cache;
mod error;
mod hash;
mod identity;
mod record;
pub mod store;
mod token;
pub mod validate;

#[cfg(feature = "sql")]
pub mod sql;

#[cfg(feature = "cli")]
pub mod cli;

pub use cache::{CacheConfig, MemoryCache, UserCache};
pub use error::AuthError;
pub use hash::PasswordCodec;
pub use identity::IdentityService;
pub use record::{Category, Credentials, NewUser, UserProfile, UserRecord, UserUpdate};
pub use store::{MemoryStore, Stats, UserStore};
pub use token::{Claims, TokenIssuer};

#[cfg(feature = "redis")]
pub use cache::RedisCache;

#[cfg(feature = "sql")]
pub use sql::{SqlStore, SqlStoreConfig};

#[cfg(feature = "cli")]
pub use cli::{AuthArgs, AuthCommands};
