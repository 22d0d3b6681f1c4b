//! Configuration type definitions for server, store, cache, token, password, metrics, and logging.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Deadline for each store/cache call, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Time allowed for in-flight requests to finish on shutdown.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
    /// Per-client request throttling.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            request_timeout_ms: default_request_timeout_ms(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Sliding-window rate limiting per client address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per client within the window.
    #[serde(default = "default_rate_limit_max_requests")]
    pub max_requests: u32,
    /// Window length in seconds.
    #[serde(default = "default_rate_limit_window_secs")]
    pub window_secs: u64,
    /// Identify clients by `X-Forwarded-For` / `X-Real-IP` when present.
    /// Only enable behind a proxy that sets these headers.
    #[serde(default = "default_trust_forwarded")]
    pub trust_forwarded: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_rate_limit_max_requests(),
            window_secs: default_rate_limit_window_secs(),
            trust_forwarded: default_trust_forwarded(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `memory`, or an SQL URL (`sqlite:`, `postgres://`, `mysql://`).
    #[serde(default = "default_store_url")]
    pub url: String,
    #[serde(default = "default_store_max_connections")]
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            max_connections: default_store_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// `memory`, or a Redis URL (`redis://`, `rediss://`).
    #[serde(default = "default_cache_url")]
    pub url: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: default_cache_url(),
            ttl_secs: default_cache_ttl_secs(),
            key_prefix: default_cache_key_prefix(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// HMAC signing secret. Usually supplied through `BCR_TOKEN_SECRET`.
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_token_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_token_issuer")]
    pub issuer: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_secs: default_token_ttl_secs(),
            issuer: default_token_issuer(),
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .field("issuer", &self.issuer)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// bcrypt cost factor (4..=31).
    #[serde(default = "default_bcrypt_cost")]
    pub cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            cost: default_bcrypt_cost(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetricsConfig {
    /// Prometheus scrape listener, e.g. `127.0.0.1:9100`. Disabled when unset.
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Log format: json, pretty, or compact. Default: pretty.
    pub format: Option<String>,
    /// Output target: stdout or stderr. Default: stderr.
    pub output: Option<String>,
    /// Per-module log level filters (e.g., {"bcr_auth": "debug", "sqlx": "warn"}).
    #[serde(default)]
    pub filters: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_defaults() {
        let cfg: RateLimitConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.max_requests, 100);
        assert_eq!(cfg.window_secs, 60);
        assert!(cfg.trust_forwarded);
    }

    #[test]
    fn cache_partial_override() {
        let cfg: CacheConfig = toml::from_str(r#"ttl_secs = 30"#).unwrap();
        assert_eq!(cfg.ttl_secs, 30);
        assert_eq!(cfg.url, "memory");
        assert_eq!(cfg.key_prefix, "cache:user:");
    }

    #[test]
    fn token_debug_hides_secret() {
        let cfg = TokenConfig {
            secret: "super-secret-value".into(),
            ..Default::default()
        };
        assert!(!format!("{cfg:?}").contains("super-secret-value"));
    }

    #[test]
    fn logging_filters() {
        let toml_str = r#"
level = "info"
format = "json"

[filters]
bcr_auth = "debug"
"#;
        let cfg: LoggingConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.format.as_deref(), Some("json"));
        assert_eq!(cfg.filters.get("bcr_auth").map(String::as_str), Some("debug"));
    }
}
