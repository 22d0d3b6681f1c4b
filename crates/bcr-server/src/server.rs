//! Composition root and serve loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bcr_auth::{
    CacheConfig as AuthCacheConfig, IdentityService, MemoryCache, MemoryStore, PasswordCodec,
    TokenIssuer, UserCache, UserStore,
};
use bcr_config::{CacheConfig, Config, StoreConfig};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::handler::router;
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

/// Upper bound on the interval between sweeps of expired in-process cache entries.
const MEMORY_CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Build the shared state from configuration: adapters, identity service,
/// token issuer and rate limiter.
///
/// Background tasks started here stop when `shutdown` is cancelled.
pub async fn build_state(
    config: &Config,
    shutdown: &CancellationToken,
) -> Result<AppState, ServerError> {
    let store = open_store(&config.store).await?;
    let cache = open_cache(&config.cache, shutdown).await?;
    let codec = PasswordCodec::new(config.password.cost)?;

    let service = IdentityService::new(store, cache, codec)
        .with_timeout(Duration::from_millis(config.server.request_timeout_ms));
    let tokens = TokenIssuer::with_options(
        config.token.secret.as_bytes(),
        Duration::from_secs(config.token.ttl_secs),
        config.token.issuer.clone(),
    )?;

    let rl = &config.server.rate_limit;
    info!(
        max_requests = rl.max_requests,
        window_secs = rl.window_secs,
        trust_forwarded = rl.trust_forwarded,
        "rate limiting enabled"
    );
    let limiter = RateLimiter::new(rl.max_requests, Duration::from_secs(rl.window_secs));

    Ok(AppState {
        service: Arc::new(service),
        tokens: Arc::new(tokens),
        limiter: Arc::new(limiter),
        trust_forwarded: rl.trust_forwarded,
    })
}

async fn open_store(config: &StoreConfig) -> Result<Arc<dyn UserStore>, ServerError> {
    if config.url == "memory" {
        info!("using in-memory store; accounts are lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    }
    open_sql_store(config).await
}

#[cfg(feature = "sql")]
async fn open_sql_store(config: &StoreConfig) -> Result<Arc<dyn UserStore>, ServerError> {
    let sql_config =
        bcr_auth::SqlStoreConfig::new(&config.url).max_connections(config.max_connections);
    let store = bcr_auth::SqlStore::connect(sql_config).await?;
    store.init_schema().await?;
    info!(db = store.database_type().as_str(), "sql store ready");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "sql"))]
async fn open_sql_store(config: &StoreConfig) -> Result<Arc<dyn UserStore>, ServerError> {
    Err(ServerError::Config(format!(
        "store url '{}' needs the sql-sqlite, sql-postgres or sql-mysql feature",
        config.url
    )))
}

async fn open_cache(
    config: &CacheConfig,
    shutdown: &CancellationToken,
) -> Result<Arc<dyn UserCache>, ServerError> {
    let cache_config = AuthCacheConfig::new(Duration::from_secs(config.ttl_secs))
        .key_prefix(config.key_prefix.clone());

    if config.url == "memory" {
        let cache = Arc::new(MemoryCache::new(cache_config));
        start_purge_task(cache.clone(), shutdown.clone());
        info!(ttl_secs = config.ttl_secs, "using in-memory cache");
        return Ok(cache);
    }
    open_redis_cache(&config.url, cache_config).await
}

#[cfg(feature = "redis")]
async fn open_redis_cache(
    url: &str,
    cache_config: AuthCacheConfig,
) -> Result<Arc<dyn UserCache>, ServerError> {
    let ttl_secs = cache_config.ttl.as_secs();
    let cache = bcr_auth::RedisCache::connect(url, cache_config).await?;
    info!(ttl_secs, "redis cache connected");
    Ok(Arc::new(cache))
}

#[cfg(not(feature = "redis"))]
async fn open_redis_cache(
    url: &str,
    _cache_config: AuthCacheConfig,
) -> Result<Arc<dyn UserCache>, ServerError> {
    Err(ServerError::Config(format!(
        "cache url '{url}' needs the redis feature"
    )))
}

fn start_purge_task(cache: Arc<MemoryCache>, shutdown: CancellationToken) {
    let interval = cache.config().ttl.min(MEMORY_CACHE_PURGE_INTERVAL);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {
                    let purged = cache.purge_expired();
                    if purged > 0 {
                        debug!(purged, "expired cache entries purged");
                    }
                }
            }
        }
    });
}

/// Run the server with a cancellation token for graceful shutdown.
pub async fn run_with_shutdown(
    config: Config,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let state = build_state(&config, &shutdown).await?;
    let listener = TcpListener::bind(&config.server.listen).await?;
    let drain = Duration::from_secs(config.server.shutdown_timeout_secs);
    serve(listener, state, drain, shutdown).await
}

/// Serve requests on an already bound listener until `shutdown` fires, then
/// give in-flight requests up to `drain` to finish.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    drain: Duration,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    info!(address = %listener.local_addr()?, "listening");
    state.limiter.start_cleanup_task();

    let app = router(state.clone()).into_make_service_with_connect_info::<SocketAddr>();
    let signal = shutdown.clone().cancelled_owned();
    let mut server =
        tokio::spawn(async move { axum::serve(listener, app).with_graceful_shutdown(signal).await });

    let result = tokio::select! {
        res = &mut server => Some(res),
        _ = shutdown.cancelled() => None,
    };
    state.limiter.shutdown();

    let result = match result {
        Some(res) => res,
        None => {
            info!("shutdown signal received, draining requests");
            match tokio::time::timeout(drain, &mut server).await {
                Ok(res) => res,
                Err(_) => {
                    warn!(timeout_secs = drain.as_secs(), "shutdown timeout, aborting open connections");
                    server.abort();
                    Ok(Ok(()))
                }
            }
        }
    };
    result.map_err(|e| ServerError::Task(e.to_string()))??;

    info!("server stopped");
    Ok(())
}

/// Run the server (blocking until error, no graceful shutdown).
pub async fn run(config: Config) -> Result<(), ServerError> {
    run_with_shutdown(config, CancellationToken::new()).await
}
