//! Metrics collection and Prometheus exporter for bcr.
//!
//! Request counts and latency per route, admission-control rejections,
//! authentication outcomes, token validation failures and adapter
//! operation outcomes.

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize Prometheus metrics exporter.
///
/// Starts an HTTP server on the given address to expose metrics.
/// Returns an error message if binding fails.
pub fn init_prometheus(listen: &str) -> Result<(), String> {
    let addr: SocketAddr = listen
        .parse()
        .map_err(|e| format!("invalid metrics listen address: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("failed to install prometheus exporter: {}", e))?;

    Ok(())
}

// ============================================================================
// Metric Names
// ============================================================================

/// Total number of HTTP requests handled, by route and status.
pub const REQUESTS_TOTAL: &str = "bcr_requests_total";
/// Request duration histogram (seconds), by route.
pub const REQUEST_DURATION_SECONDS: &str = "bcr_request_duration_seconds";
/// Total number of requests rejected by admission control.
pub const RATE_LIMITED_TOTAL: &str = "bcr_rate_limited_total";
/// Total number of successful logins.
pub const AUTH_SUCCESS_TOTAL: &str = "bcr_auth_success_total";
/// Total number of failed logins, by error kind.
pub const AUTH_FAILURE_TOTAL: &str = "bcr_auth_failure_total";
/// Total number of registered accounts.
pub const REGISTRATIONS_TOTAL: &str = "bcr_registrations_total";
/// Total number of rejected bearer tokens, by error kind.
pub const TOKEN_REJECTED_TOTAL: &str = "bcr_token_rejected_total";
/// Total number of service errors by type.
pub const ERRORS_TOTAL: &str = "bcr_errors_total";

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a completed HTTP request.
/// The route should be the matched route template (e.g. `/login`), never the raw path.
#[inline]
pub fn record_request(route: &str, status: u16, duration_secs: f64) {
    counter!(REQUESTS_TOTAL, "route" => route.to_owned(), "status" => status.to_string())
        .increment(1);
    histogram!(REQUEST_DURATION_SECONDS, "route" => route.to_owned()).record(duration_secs);
}

/// Record a request rejected by the rate limiter.
#[inline]
pub fn record_rate_limited() {
    counter!(RATE_LIMITED_TOTAL).increment(1);
}

/// Record successful authentication.
#[inline]
pub fn record_auth_success() {
    counter!(AUTH_SUCCESS_TOTAL).increment(1);
}

/// Record failed authentication.
#[inline]
pub fn record_auth_failure(kind: &'static str) {
    counter!(AUTH_FAILURE_TOTAL, "kind" => kind).increment(1);
}

/// Record a new account.
#[inline]
pub fn record_registration() {
    counter!(REGISTRATIONS_TOTAL).increment(1);
}

/// Record a bearer token that failed validation.
#[inline]
pub fn record_token_rejected(kind: &'static str) {
    counter!(TOKEN_REJECTED_TOTAL, "kind" => kind).increment(1);
}

/// Record an error by type.
#[inline]
pub fn record_error(error_type: &'static str) {
    counter!(ERRORS_TOTAL, "type" => error_type).increment(1);
}

// ============================================================================
// Error Type Constants (re-exported from bcr-core)
// ============================================================================

pub use bcr_core::{
    ERROR_ALREADY_EXISTS, ERROR_CONFIG, ERROR_EXPIRED_TOKEN, ERROR_INTERNAL, ERROR_INVALID_TOKEN,
    ERROR_IO, ERROR_NOT_FOUND, ERROR_NOT_FOUND_IN_CACHE, ERROR_TIMEOUT, ERROR_UNAUTHORIZED,
    ERROR_UNAVAILABLE, ERROR_VALIDATION,
};
