//! Account service HTTP server.
//!
//! This module exposes the server implementation for use by integration tests
//! and potential embedding scenarios.

pub mod cli;
mod client_ip;
mod error;
mod handler;
mod rate_limit;
mod server;
mod state;

pub use cli::ServerArgs;
pub use client_ip::{UNKNOWN_CLIENT, client_id};
pub use error::{ApiError, ServerError, status_for};
pub use handler::{AuthUser, router};
pub use rate_limit::RateLimiter;
pub use server::{build_state, run, run_with_shutdown, serve};
pub use state::{AppState, Service};
pub use tokio_util::sync::CancellationToken;
