//! # bcr
//!
//! An account service: registration, login, profile updates and deletion
//! over a durable store with a read-through cache, plus signed session
//! tokens and per-client admission control.
//!
//! ## Crates
//!
//! - [`bcr_core`] - Default configuration values and error labels
//! - [`bcr_auth`] - Identity service, adapters, password codec and token issuer
//! - [`bcr_config`] - Configuration loading and validation
//! - [`bcr_metrics`] - Prometheus-compatible metrics
//! - [`bcr_server`] - HTTP server and rate limiter

pub use bcr_auth as auth;
pub use bcr_config as config;
pub use bcr_core as core;
pub use bcr_metrics as metrics;
pub use bcr_server as server;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use bcr_auth::{
        AuthError, Credentials, IdentityService, MemoryCache, MemoryStore, NewUser,
        PasswordCodec, TokenIssuer, UserCache, UserStore, UserUpdate,
    };
    pub use bcr_config::{Config, load_config, validate_config};
    pub use bcr_server::{CancellationToken, ServerError, run, run_with_shutdown};
}
