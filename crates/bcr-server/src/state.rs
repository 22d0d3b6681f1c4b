//! State shared by all request handlers.

use std::sync::Arc;

use bcr_auth::{IdentityService, TokenIssuer, UserCache, UserStore};

use crate::rate_limit::RateLimiter;

/// Identity service over type-erased adapters chosen at startup.
pub type Service = IdentityService<Arc<dyn UserStore>, Arc<dyn UserCache>>;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service>,
    pub tokens: Arc<TokenIssuer>,
    pub limiter: Arc<RateLimiter>,
    /// Honour `X-Forwarded-For` / `X-Real-IP` when identifying clients.
    pub trust_forwarded: bool,
}
