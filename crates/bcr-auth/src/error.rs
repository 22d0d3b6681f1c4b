//! Authentication error types.

use bcr_core::errors::{
    ERROR_ALREADY_EXISTS, ERROR_EXPIRED_TOKEN, ERROR_INTERNAL, ERROR_INVALID_TOKEN,
    ERROR_NOT_FOUND, ERROR_NOT_FOUND_IN_CACHE, ERROR_TIMEOUT, ERROR_UNAUTHORIZED,
    ERROR_UNAVAILABLE, ERROR_VALIDATION,
};

/// Error taxonomy shared by the codec, validator, adapters, identity service
/// and token issuer.
///
/// Callers branch on the variant, never on the message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Bad input. Always the client's fault; never retried.
    #[error("validation: {0}")]
    Validation(String),

    /// Wrong or missing credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Record absent from the durable store.
    #[error("user not found")]
    NotFound,

    /// Entry absent from the cache. Non-fatal to callers.
    #[error("user not found in cache")]
    NotFoundInCache,

    /// Registration conflict on the username.
    #[error("username already exists")]
    AlreadyExists,

    /// Adapter or transport failure. The message is for logs only.
    #[error("internal: {0}")]
    Internal(String),

    /// Health check failure.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Token signature, algorithm, issuer or shape check failed.
    #[error("invalid token")]
    InvalidToken,

    /// Token is past its expiry.
    #[error("expired token")]
    ExpiredToken,

    /// The operation deadline elapsed before the adapter answered.
    #[error("operation timed out")]
    Timeout,
}

impl AuthError {
    /// Create an internal error from any error type.
    #[inline]
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        Self::Internal(err.to_string())
    }

    /// Create a validation error.
    #[inline]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Whether this error means "no such entry", from either adapter.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound | Self::NotFoundInCache)
    }

    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => ERROR_VALIDATION,
            Self::Unauthorized => ERROR_UNAUTHORIZED,
            Self::NotFound => ERROR_NOT_FOUND,
            Self::NotFoundInCache => ERROR_NOT_FOUND_IN_CACHE,
            Self::AlreadyExists => ERROR_ALREADY_EXISTS,
            Self::Internal(_) => ERROR_INTERNAL,
            Self::Unavailable(_) => ERROR_UNAVAILABLE,
            Self::InvalidToken => ERROR_INVALID_TOKEN,
            Self::ExpiredToken => ERROR_EXPIRED_TOKEN,
            Self::Timeout => ERROR_TIMEOUT,
        }
    }
}

#[cfg(feature = "sql")]
impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Self::AlreadyExists,
            sqlx::Error::PoolTimedOut => Self::Timeout,
            other => Self::internal(other),
        }
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for AuthError {
    fn from(err: redis::RedisError) -> Self {
        Self::internal(err)
    }
}
