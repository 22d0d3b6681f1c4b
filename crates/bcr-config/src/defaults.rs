//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `bcr_core::defaults`.

use bcr_core::defaults;

/// Generate default value functions that forward to bcr_core::defaults constants.
macro_rules! default_fns {
    // For Copy types (integers, bool, etc.)
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_request_timeout_ms      => DEFAULT_REQUEST_TIMEOUT_MS: u64,
    default_shutdown_timeout_secs   => DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64,
    default_rate_limit_max_requests => DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32,
    default_rate_limit_window_secs  => DEFAULT_RATE_LIMIT_WINDOW_SECS: u64,
    default_trust_forwarded         => DEFAULT_RATE_LIMIT_TRUST_FORWARDED: bool,
    default_store_max_connections   => DEFAULT_STORE_MAX_CONNECTIONS: u32,
    default_cache_ttl_secs          => DEFAULT_CACHE_TTL_SECS: u64,
    default_token_ttl_secs          => DEFAULT_TOKEN_TTL_SECS: u64,
    default_bcrypt_cost             => DEFAULT_BCRYPT_COST: u32,
    min_bcrypt_cost                 => MIN_BCRYPT_COST: u32,
    max_bcrypt_cost                 => MAX_BCRYPT_COST: u32,
    min_token_secret_len            => MIN_TOKEN_SECRET_LEN: usize,
}

default_string_fns! {
    default_listen           => DEFAULT_LISTEN,
    default_store_url        => DEFAULT_STORE_URL,
    default_cache_url        => DEFAULT_CACHE_URL,
    default_cache_key_prefix => DEFAULT_CACHE_KEY_PREFIX,
    default_token_issuer     => DEFAULT_TOKEN_ISSUER,
}
