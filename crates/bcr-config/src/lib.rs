//! Configuration loading, CLI overrides, and validation for the account service.

mod cli;
mod defaults;
mod loader;
mod types;
mod validate;

use serde::{Deserialize, Serialize};

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, load_config};
pub use types::{
    CacheConfig, LoggingConfig, MetricsConfig, PasswordConfig, RateLimitConfig, ServerConfig,
    StoreConfig, TokenConfig,
};
pub use validate::validate_config;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    const SECRET: &str = "0123456789abcdef0123";

    fn valid() -> Config {
        let mut cfg = Config::default();
        cfg.token.secret = SECRET.into();
        cfg
    }

    fn write_temp(name: &str, body: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bcr-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_need_only_a_secret() {
        assert!(matches!(
            validate_config(&Config::default()),
            Err(ConfigError::Validation(_))
        ));
        validate_config(&valid()).unwrap();
    }

    #[test]
    fn load_toml() {
        let path = write_temp(
            "cfg.toml",
            r#"
[server]
listen = "0.0.0.0:9000"

[server.rate_limit]
max_requests = 5

[token]
secret = "0123456789abcdef0123"
ttl_secs = 60

[cache]
ttl_secs = 120
"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.listen, "0.0.0.0:9000");
        assert_eq!(cfg.server.rate_limit.max_requests, 5);
        assert_eq!(cfg.server.rate_limit.window_secs, 60);
        assert_eq!(cfg.token.ttl_secs, 60);
        assert_eq!(cfg.cache.ttl_secs, 120);
        assert_eq!(cfg.store.url, "memory");
        validate_config(&cfg).unwrap();
    }

    #[test]
    fn load_jsonc_with_comments() {
        let path = write_temp(
            "cfg.jsonc",
            r#"{
  // signing key
  "token": { "secret": "0123456789abcdef0123" },
  "password": { "cost": 10 }
}"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.password.cost, 10);
        assert_eq!(cfg.token.issuer, "bcr-auth");
    }

    #[test]
    fn load_yaml() {
        let path = write_temp(
            "cfg.yaml",
            "store:\n  url: \"sqlite::memory:\"\nlogging:\n  level: debug\n",
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.store.url, "sqlite::memory:");
        assert_eq!(cfg.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn unsupported_extension() {
        let path = write_temp("cfg.ini", "listen=1");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::UnsupportedFormat)
        ));
    }

    #[test]
    fn overrides_apply() {
        let mut cfg = Config::default();
        let overrides = CliOverrides {
            listen: Some("0.0.0.0:1".into()),
            token_secret: Some(SECRET.into()),
            cache_url: Some("redis://127.0.0.1/".into()),
            bcrypt_cost: Some(4),
            rate_limit_max_requests: Some(7),
            trust_forwarded: Some(false),
            metrics_listen: Some("127.0.0.1:9100".into()),
            ..Default::default()
        };
        apply_overrides(&mut cfg, &overrides);
        assert_eq!(cfg.server.listen, "0.0.0.0:1");
        assert_eq!(cfg.token.secret, SECRET);
        assert_eq!(cfg.cache.url, "redis://127.0.0.1/");
        assert_eq!(cfg.password.cost, 4);
        assert_eq!(cfg.server.rate_limit.max_requests, 7);
        assert!(!cfg.server.rate_limit.trust_forwarded);
        assert_eq!(cfg.metrics.listen.as_deref(), Some("127.0.0.1:9100"));
        validate_config(&cfg).unwrap();
    }

    #[test]
    fn overrides_debug_hides_secret() {
        let overrides = CliOverrides {
            token_secret: Some(SECRET.into()),
            ..Default::default()
        };
        assert!(!format!("{overrides:?}").contains(SECRET));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let cases: Vec<(&str, Box<dyn Fn(&mut Config)>)> = vec![
            ("short secret", Box::new(|c| c.token.secret = "short".into())),
            ("zero token ttl", Box::new(|c| c.token.ttl_secs = 0)),
            ("zero cache ttl", Box::new(|c| c.cache.ttl_secs = 0)),
            ("zero timeout", Box::new(|c| c.server.request_timeout_ms = 0)),
            ("zero ceiling", Box::new(|c| c.server.rate_limit.max_requests = 0)),
            ("zero window", Box::new(|c| c.server.rate_limit.window_secs = 0)),
            ("low cost", Box::new(|c| c.password.cost = 3)),
            ("high cost", Box::new(|c| c.password.cost = 32)),
            ("empty listen", Box::new(|c| c.server.listen = " ".into())),
            ("empty prefix", Box::new(|c| c.cache.key_prefix.clear())),
            ("bad store", Box::new(|c| c.store.url = "cassandra://x".into())),
            ("bad cache", Box::new(|c| c.cache.url = "memcached://x".into())),
            ("bad level", Box::new(|c| c.logging.level = Some("loud".into()))),
            ("bad format", Box::new(|c| c.logging.format = Some("xml".into()))),
            ("bad output", Box::new(|c| c.logging.output = Some("file".into()))),
        ];
        for (name, mutate) in cases {
            let mut cfg = valid();
            mutate(&mut cfg);
            assert!(
                matches!(validate_config(&cfg), Err(ConfigError::Validation(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn validation_accepts_supported_backends() {
        for url in ["memory", "sqlite::memory:", "postgres://u@h/db", "mysql://u@h/db"] {
            let mut cfg = valid();
            cfg.store.url = url.into();
            validate_config(&cfg).unwrap();
        }
        for url in ["memory", "redis://127.0.0.1/", "rediss://cache:6380/0"] {
            let mut cfg = valid();
            cfg.cache.url = url.into();
            validate_config(&cfg).unwrap();
        }
    }
}
