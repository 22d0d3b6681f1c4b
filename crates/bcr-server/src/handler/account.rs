//! Registration, profile changes, deletion and the ad category lookup.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use bcr_auth::{Category, NewUser, UserProfile, UserUpdate};
use bcr_metrics::record_registration;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Body of `POST /update`: the current password plus the fields to change.
#[derive(Deserialize)]
pub(crate) struct UpdateRequest {
    pub password: String,
    #[serde(flatten)]
    pub changes: UserUpdate,
}

#[derive(Deserialize)]
pub(crate) struct DeleteRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdsResponse {
    pub category: Category,
    pub segment: &'static str,
}

/// `POST /register {username, password, email, category?}`
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(user): Json<NewUser>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let profile = state.service.register(&user).await?;
    record_registration();
    info!(username = %profile.username, category = %profile.category, "account registered");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// `POST /update` with a bearer token. The password in the body must still
/// match; a token alone cannot change credentials.
pub(crate) async fn update(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state
        .service
        .update(&username, &req.password, &req.changes)
        .await?;
    info!(username = %profile.username, "account updated");
    Ok(Json(profile))
}

/// `DELETE /delete {password}` with a bearer token.
pub(crate) async fn delete(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Json(req): Json<DeleteRequest>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(&username, &req.password).await?;
    info!(username = %username, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /get_ads -> {category, segment}`
pub(crate) async fn get_ads(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<AdsResponse>, ApiError> {
    let profile = state.service.profile(&username).await?;
    Ok(Json(AdsResponse {
        category: profile.category,
        segment: profile.category.as_str(),
    }))
}
