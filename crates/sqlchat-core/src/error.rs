//! Error types for the SQL Chat gateway.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqlChatError {
    /// Absent or owned by someone else; the two cases are not distinguished.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("User already exists")]
    UserExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Translation service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Translation service timed out after {0:?}")]
    UpstreamTimeout(Duration),

    #[error("Translation service error: {0}")]
    UpstreamFailure(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

impl SqlChatError {
    pub fn missing_fields() -> Self {
        SqlChatError::Validation("Missing required fields".to_string())
    }
}
