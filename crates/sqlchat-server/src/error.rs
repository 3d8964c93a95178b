//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sqlchat_core::SqlChatError;
use sqlchat_types::{ErrorBody, ErrorCode};
use tracing::{error, warn};

/// Every handler failure funnels through here.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or bad bearer token.
    Unauthorized(String),
    /// Malformed request body.
    BadRequest(String),
    Core(SqlChatError),
}

impl From<SqlChatError> for ApiError {
    fn from(err: SqlChatError) -> Self {
        ApiError::Core(err)
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::Validation, msg.clone()),
            ApiError::Core(err) => match err {
                SqlChatError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, err.to_string()),
                SqlChatError::Validation(_) | SqlChatError::UserExists => {
                    (StatusCode::BAD_REQUEST, ErrorCode::Validation, err.to_string())
                }
                SqlChatError::InvalidCredentials
                | SqlChatError::AccountDeactivated
                | SqlChatError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, err.to_string())
                }
                SqlChatError::UpstreamUnavailable(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorCode::ServiceUnavailable,
                    "Query translation service is not available".to_string(),
                ),
                SqlChatError::UpstreamTimeout(_) => (
                    StatusCode::GATEWAY_TIMEOUT,
                    ErrorCode::Timeout,
                    "Query translation service timed out".to_string(),
                ),
                SqlChatError::UpstreamFailure(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Internal,
                    "Failed to process query".to_string(),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Internal,
                    "Internal server error".to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            // Details stay in the log; the body only carries the category
            if let ApiError::Core(err) = &self {
                error!(target: "sqlchat::api", "{} {}", status.as_u16(), err);
            }
        } else if status == StatusCode::UNAUTHORIZED {
            warn!(target: "sqlchat::auth", "Rejected request: {}", message);
        }
        (status, Json(ErrorBody::new(code, message))).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
