//! Configuration validation logic.

use crate::Config;
use crate::defaults::{max_bcrypt_cost, min_bcrypt_cost, min_token_secret_len};
use crate::loader::ConfigError;

const STORE_SCHEMES: [&str; 5] = ["sqlite:", "postgres://", "postgresql://", "mysql://", "mariadb://"];
const CACHE_SCHEMES: [&str; 2] = ["redis://", "rediss://"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];
const LOG_OUTPUTS: [&str; 2] = ["stderr", "stdout"];

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.listen.trim().is_empty() {
        return Err(ConfigError::Validation("server.listen is empty".into()));
    }
    if config.server.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "server.request_timeout_ms must be > 0".into(),
        ));
    }
    let rl = &config.server.rate_limit;
    if rl.max_requests == 0 {
        return Err(ConfigError::Validation(
            "server.rate_limit.max_requests must be > 0".into(),
        ));
    }
    if rl.window_secs == 0 {
        return Err(ConfigError::Validation(
            "server.rate_limit.window_secs must be > 0".into(),
        ));
    }

    let store_url = config.store.url.as_str();
    if store_url != "memory" && !STORE_SCHEMES.iter().any(|s| store_url.starts_with(s)) {
        return Err(ConfigError::Validation(format!(
            "store.url must be 'memory' or start with one of: {:?}",
            STORE_SCHEMES
        )));
    }
    if config.store.max_connections == 0 {
        return Err(ConfigError::Validation(
            "store.max_connections must be > 0".into(),
        ));
    }

    let cache_url = config.cache.url.as_str();
    if cache_url != "memory" && !CACHE_SCHEMES.iter().any(|s| cache_url.starts_with(s)) {
        return Err(ConfigError::Validation(format!(
            "cache.url must be 'memory' or start with one of: {:?}",
            CACHE_SCHEMES
        )));
    }
    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::Validation("cache.ttl_secs must be > 0".into()));
    }
    if config.cache.key_prefix.is_empty() {
        return Err(ConfigError::Validation("cache.key_prefix is empty".into()));
    }

    if config.token.secret.is_empty() {
        return Err(ConfigError::Validation(
            "token.secret is empty (set BCR_TOKEN_SECRET)".into(),
        ));
    }
    if config.token.secret.len() < min_token_secret_len() {
        return Err(ConfigError::Validation(format!(
            "token.secret must be at least {} bytes",
            min_token_secret_len()
        )));
    }
    if config.token.ttl_secs == 0 {
        return Err(ConfigError::Validation("token.ttl_secs must be > 0".into()));
    }
    if config.token.issuer.trim().is_empty() {
        return Err(ConfigError::Validation("token.issuer is empty".into()));
    }

    if !(min_bcrypt_cost()..=max_bcrypt_cost()).contains(&config.password.cost) {
        return Err(ConfigError::Validation(format!(
            "password.cost must be {}..={}",
            min_bcrypt_cost(),
            max_bcrypt_cost()
        )));
    }

    if let Some(listen) = &config.metrics.listen
        && listen.trim().is_empty()
    {
        return Err(ConfigError::Validation("metrics.listen is empty".into()));
    }

    let logging = &config.logging;
    if let Some(level) = &logging.level
        && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
    {
        return Err(ConfigError::Validation(format!(
            "logging.level must be one of: {:?}",
            LOG_LEVELS
        )));
    }
    if let Some(format) = &logging.format
        && !LOG_FORMATS.contains(&format.as_str())
    {
        return Err(ConfigError::Validation(format!(
            "logging.format must be one of: {:?}",
            LOG_FORMATS
        )));
    }
    if let Some(output) = &logging.output
        && !LOG_OUTPUTS.contains(&output.as_str())
    {
        return Err(ConfigError::Validation(format!(
            "logging.output must be one of: {:?}",
            LOG_OUTPUTS
        )));
    }
    Ok(())
}
