//! HTTP surface: routes, admission control and bearer-token extraction.

mod account;
mod ops;
mod session;

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, FromRequestParts, MatchedPath, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use bcr_auth::AuthError;
use bcr_metrics::{record_rate_limited, record_request, record_token_rejected};
use serde_json::json;
use tracing::debug;

use crate::client_ip::client_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Build the application router.
///
/// Every request passes the rate limiter first; rejected requests get 429
/// before any handler runs.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(session::login))
        .route("/register", post(account::register))
        .route("/update", post(account::update))
        .route("/delete", delete(account::delete))
        .route("/get_ads", get(account::get_ads))
        .route("/stats", get(ops::stats))
        .route("/health", get(ops::health))
        .route_layer(middleware::from_fn(track_requests))
        .layer(middleware::from_fn_with_state(state.clone(), admission))
        .with_state(state)
}

async fn admission(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_id(req.headers(), peer, state.trust_forwarded);

    if state.limiter.allow(&client) {
        return next.run(req).await;
    }

    record_rate_limited();
    debug!(client = %client, "request rejected by rate limiter");
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "error": "rate_limited", "message": "too many requests" })),
    )
        .into_response();
    if let Ok(retry) = HeaderValue::try_from(state.limiter.window().as_secs().max(1).to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, retry);
    }
    response
}

async fn track_requests(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned());
    let start = Instant::now();
    let response = next.run(req).await;
    if let Some(route) = route {
        record_request(&route, response.status().as_u16(), start.elapsed().as_secs_f64());
    }
    response
}

/// Username proven by a valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Unauthorized)?;

        match state.tokens.validate(token) {
            Ok(username) => Ok(AuthUser(username)),
            Err(err) => {
                record_token_rejected(err.kind());
                debug!(kind = err.kind(), "bearer token rejected");
                Err(err.into())
            }
        }
    }
}
