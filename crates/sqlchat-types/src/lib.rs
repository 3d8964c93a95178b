//! Shared types for the SQL Chat gateway and its dashboard client.

mod chat;
mod connection;
mod error;
mod schema;
mod settings;
mod translator;
mod user;

pub use chat::*;
pub use connection::*;
pub use error::*;
pub use schema::*;
pub use settings::*;
pub use translator::*;
pub use user::*;
