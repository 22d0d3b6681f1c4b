use axum::Json;
use axum::extract::State;
use bcr_auth::Stats;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /stats -> {store: {...}, cache: {...}, rate_limit: {...}}`
pub(crate) async fn stats(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    let mut stats = state.service.stats().await?;
    stats.insert(
        "rate_limit".to_string(),
        json!({
            "clients": state.limiter.len(),
            "max_requests": state.limiter.max_requests(),
            "window_secs": state.limiter.window().as_secs(),
        }),
    );
    Ok(Json(stats))
}

/// `GET /health`: 200 when both adapters answer, 503 otherwise.
pub(crate) async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.service.health().await?;
    Ok(Json(json!({ "status": "ok" })))
}
