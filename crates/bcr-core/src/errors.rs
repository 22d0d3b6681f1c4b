//! Error type constants for metrics and logging.
//!
//! These constants provide consistent error classification across all crates.

/// Input failed field-level validation.
pub const ERROR_VALIDATION: &str = "validation";
/// Wrong or missing credentials.
pub const ERROR_UNAUTHORIZED: &str = "unauthorized";
/// Record absent from the durable store.
pub const ERROR_NOT_FOUND: &str = "not_found";
/// Entry absent from the cache.
pub const ERROR_NOT_FOUND_IN_CACHE: &str = "not_found_in_cache";
/// Registration conflict.
pub const ERROR_ALREADY_EXISTS: &str = "already_exists";
/// Adapter or transport failure.
pub const ERROR_INTERNAL: &str = "internal";
/// Health check failure.
pub const ERROR_UNAVAILABLE: &str = "unavailable";
/// Token failed signature, algorithm or claim checks.
pub const ERROR_INVALID_TOKEN: &str = "invalid_token";
/// Token past its expiry.
pub const ERROR_EXPIRED_TOKEN: &str = "expired_token";
/// Operation deadline elapsed.
pub const ERROR_TIMEOUT: &str = "timeout";
/// Configuration error.
pub const ERROR_CONFIG: &str = "config";
/// I/O error.
pub const ERROR_IO: &str = "io";
