//! CLI override definitions and application logic.

use clap::Parser;

use crate::Config;

#[derive(Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override HTTP listen address, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub listen: Option<String>,
    /// Override per-call store/cache deadline (milliseconds)
    #[arg(long)]
    pub request_timeout_ms: Option<u64>,
    /// Override durable store URL (memory, sqlite:..., postgres://..., mysql://...)
    #[arg(long, env = "BCR_STORE_URL")]
    pub store_url: Option<String>,
    /// Override cache URL (memory, redis://...)
    #[arg(long, env = "BCR_CACHE_URL")]
    pub cache_url: Option<String>,
    /// Override cache entry lifetime (seconds)
    #[arg(long)]
    pub cache_ttl_secs: Option<u64>,
    /// Token signing secret
    #[arg(long, env = "BCR_TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: Option<String>,
    /// Override token lifetime (seconds)
    #[arg(long)]
    pub token_ttl_secs: Option<u64>,
    /// Override bcrypt cost factor
    #[arg(long)]
    pub bcrypt_cost: Option<u32>,
    /// Override maximum requests per client within the window
    #[arg(long)]
    pub rate_limit_max_requests: Option<u32>,
    /// Override rate limit window (seconds)
    #[arg(long)]
    pub rate_limit_window_secs: Option<u64>,
    /// Trust X-Forwarded-For / X-Real-IP for client identity
    #[arg(long)]
    pub trust_forwarded: Option<bool>,
    /// Override metrics listen address
    #[arg(long)]
    pub metrics_listen: Option<String>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl std::fmt::Debug for CliOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliOverrides")
            .field("listen", &self.listen)
            .field("store_url", &self.store_url)
            .field("cache_url", &self.cache_url)
            .field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.listen {
        config.server.listen = v.clone();
    }
    if let Some(v) = overrides.request_timeout_ms {
        config.server.request_timeout_ms = v;
    }
    if let Some(v) = &overrides.store_url {
        config.store.url = v.clone();
    }
    if let Some(v) = &overrides.cache_url {
        config.cache.url = v.clone();
    }
    if let Some(v) = overrides.cache_ttl_secs {
        config.cache.ttl_secs = v;
    }
    if let Some(v) = &overrides.token_secret {
        config.token.secret = v.clone();
    }
    if let Some(v) = overrides.token_ttl_secs {
        config.token.ttl_secs = v;
    }
    if let Some(v) = overrides.bcrypt_cost {
        config.password.cost = v;
    }
    if let Some(v) = overrides.rate_limit_max_requests {
        config.server.rate_limit.max_requests = v;
    }
    if let Some(v) = overrides.rate_limit_window_secs {
        config.server.rate_limit.window_secs = v;
    }
    if let Some(v) = overrides.trust_forwarded {
        config.server.rate_limit.trust_forwarded = v;
    }
    if let Some(v) = &overrides.metrics_listen {
        config.metrics.listen = Some(v.clone());
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
}
