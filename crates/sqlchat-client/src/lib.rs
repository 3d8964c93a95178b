//! Dashboard-side logic for the SQL Chat gateway: a typed HTTP client, the
//! local key-value store it keeps its token and cached schemas in, and the
//! schema reshaping shown in the schema tab.

mod error;
mod gateway;
mod schema;
mod store;

pub use error::ClientError;
pub use gateway::GatewayClient;
pub use schema::{reshape_schema, SchemaCache};
pub use store::{schema_key, LocalStore, MemoryStore, AUTH_TOKEN_KEY, USER_DATA_KEY};

/// Result type for client calls.
pub type Result<T> = std::result::Result<T, ClientError>;
