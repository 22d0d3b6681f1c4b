//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Server Defaults
// ============================================================================

/// Default HTTP listen address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8443";
/// Default per-operation deadline for store and cache calls, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
/// Default graceful shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Rate Limit Defaults
// ============================================================================

/// Default max requests per client inside one window.
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;
/// Default rate limit window in seconds.
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
/// Honour `X-Forwarded-For` / `X-Real-IP` when deriving client identity.
pub const DEFAULT_RATE_LIMIT_TRUST_FORWARDED: bool = true;

// ============================================================================
// Store / Cache Defaults
// ============================================================================

/// Default durable store URL (`memory` = in-process map).
pub const DEFAULT_STORE_URL: &str = "memory";
/// Default SQL pool size.
pub const DEFAULT_STORE_MAX_CONNECTIONS: u32 = 10;
/// Default cache URL (`memory` = in-process TTL map).
pub const DEFAULT_CACHE_URL: &str = "memory";
/// Default cache entry TTL in seconds (24 hours).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
/// Default cache key namespace.
pub const DEFAULT_CACHE_KEY_PREFIX: &str = "cache:user:";

// ============================================================================
// Credential Defaults
// ============================================================================

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 12;
/// Lowest bcrypt cost accepted by the codec.
pub const MIN_BCRYPT_COST: u32 = 4;
/// Highest bcrypt cost accepted by the codec.
pub const MAX_BCRYPT_COST: u32 = 31;

/// Username length bounds (inclusive).
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 20;
/// Plaintext password length bounds (inclusive).
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;
/// Email length bounds (RFC 5321 path limit).
pub const MIN_EMAIL_LEN: usize = 3;
pub const MAX_EMAIL_LEN: usize = 254;

// ============================================================================
// Token Defaults
// ============================================================================

/// Default session token lifetime in seconds (15 minutes).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 15 * 60;
/// Default token issuer claim.
pub const DEFAULT_TOKEN_ISSUER: &str = "bcr-auth";
/// Minimum accepted signing secret length in bytes.
pub const MIN_TOKEN_SECRET_LEN: usize = 16;
