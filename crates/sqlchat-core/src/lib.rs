//! Persistence, authentication and chat orchestration for the SQL Chat gateway.

mod accounts;
mod auth;
mod chat;
mod chat_store;
mod connections;
mod db;
mod error;
mod registry;
mod settings;
mod translator;
mod users;

pub use accounts::Accounts;
pub use auth::{hash_password, verify_password, Claims, TokenSigner};
pub use chat::ChatService;
pub use chat_store::TurnTarget;
pub use db::Store;
pub use error::SqlChatError;
pub use registry::ConnectionRegistry;
pub use translator::{QueryTranslator, TranslatorClient};

use uuid::Uuid;

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, SqlChatError>;

/// Parse a client-supplied identifier.
///
/// A malformed id cannot name an existing row, so it is reported as not found.
pub fn parse_id(raw: &str, what: &'static str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| SqlChatError::NotFound(what))
}
