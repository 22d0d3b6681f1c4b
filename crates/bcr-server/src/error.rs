//! Server error types and the HTTP mapping of [`AuthError`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bcr_auth::AuthError;
use bcr_metrics::{ERROR_CONFIG, ERROR_INTERNAL, ERROR_IO, record_error};
use serde_json::json;
use tracing::{debug, error};

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("auth: {0}")]
    Auth(#[from] AuthError),
    #[error("config: {0}")]
    Config(String),
    #[error("task: {0}")]
    Task(String),
}

impl ServerError {
    /// Get the error type string for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Io(_) => ERROR_IO,
            ServerError::Auth(e) => e.kind(),
            ServerError::Config(_) => ERROR_CONFIG,
            ServerError::Task(_) => ERROR_INTERNAL,
        }
    }
}

/// Status code for each error kind.
pub fn status_for(err: &AuthError) -> StatusCode {
    match err {
        AuthError::Validation(_) => StatusCode::BAD_REQUEST,
        AuthError::Unauthorized | AuthError::InvalidToken | AuthError::ExpiredToken => {
            StatusCode::UNAUTHORIZED
        }
        AuthError::NotFound | AuthError::NotFoundInCache => StatusCode::NOT_FOUND,
        AuthError::AlreadyExists => StatusCode::CONFLICT,
        AuthError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AuthError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// [`AuthError`] rendered as a JSON error response.
///
/// The body is `{"error": <kind>, "message": <text>}`. Internal and
/// availability failures get a generic message; the detail goes to the log.
#[derive(Debug)]
pub struct ApiError(pub AuthError);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let kind = self.0.kind();
        let message = match &self.0 {
            AuthError::Internal(_) => {
                record_error(kind);
                error!(error = %self.0, "request failed");
                "internal error".to_string()
            }
            AuthError::Unavailable(_) => {
                record_error(kind);
                error!(error = %self.0, "backend unavailable");
                "service unavailable".to_string()
            }
            other => {
                debug!(kind, "request rejected");
                other.to_string()
            }
        };
        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}
