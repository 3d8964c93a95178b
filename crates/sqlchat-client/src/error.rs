//! Errors surfaced to the dashboard.

use sqlchat_types::{ErrorBody, ErrorCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// No token, or the gateway rejected it. The user must log in again.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// The query translation service behind the gateway is down.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Classify a failed gateway response.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let message = parsed
            .as_ref()
            .map(|b| b.error.clone())
            .unwrap_or_else(|| format!("HTTP {status}"));

        match (status, parsed.map(|b| b.code)) {
            (401, _) | (_, Some(ErrorCode::Unauthorized)) => ClientError::Unauthorized(message),
            (404, _) | (_, Some(ErrorCode::NotFound)) => ClientError::NotFound(message),
            (400, _) | (_, Some(ErrorCode::Validation)) => ClientError::Validation(message),
            (503, _) | (_, Some(ErrorCode::ServiceUnavailable)) => {
                ClientError::ServiceUnavailable(message)
            }
            (504, _) | (_, Some(ErrorCode::Timeout)) => ClientError::Timeout(message),
            _ => ClientError::Api { status, message },
        }
    }

    pub fn requires_login(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }
}
