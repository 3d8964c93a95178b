//! JSON error body returned by every failing gateway request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Missing, invalid or expired token, or bad credentials.
    Unauthorized,
    /// Resource absent or not owned by the caller.
    NotFound,
    /// Missing or invalid request fields.
    Validation,
    /// The translation service could not be reached.
    ServiceUnavailable,
    /// A call to the translation service exceeded its bound.
    Timeout,
    /// Persistence failure or anything unexpected.
    Internal,
}

/// Error response body: `{"error": "...", "code": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: ErrorCode,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

/// Plain acknowledgement body, e.g. `{"message": "Connection deleted successfully"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A string did not name a known variant of one of the enumerated fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field}: '{value}'")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}
