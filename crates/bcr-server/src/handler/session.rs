//! Login.

use axum::Json;
use axum::extract::State;
use bcr_auth::Credentials;
use bcr_metrics::{record_auth_failure, record_auth_success};
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub token: String,
    pub expires_in: u64,
}

/// `POST /login {username, password} -> {token, expires_in}`
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    let profile = match state.service.login(&credentials).await {
        Ok(profile) => profile,
        Err(err) => {
            record_auth_failure(err.kind());
            return Err(err.into());
        }
    };
    record_auth_success();

    let token = state.tokens.issue(&profile.username)?;
    info!(username = %profile.username, "login succeeded");
    Ok(Json(TokenResponse {
        token,
        expires_in: state.tokens.ttl().as_secs(),
    }))
}
