//! Saved database connection descriptors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::ParseEnumError;

/// SQL dialect of a saved connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgresql,
    Mysql,
    Sqlserver,
}

impl Dialect {
    /// Every accepted dialect, in the order shown to users.
    pub const ALL: [Dialect; 3] = [Dialect::Postgresql, Dialect::Mysql, Dialect::Sqlserver];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Postgresql => "postgresql",
            Dialect::Mysql => "mysql",
            Dialect::Sqlserver => "sqlserver",
        }
    }

    /// Upper-case name expected by the translation service.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Dialect::Postgresql => "POSTGRESQL",
            Dialect::Mysql => "MYSQL",
            Dialect::Sqlserver => "SQLSERVER",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("database type", s))
    }
}

/// A user's saved connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConnection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub dialect: Dialect,
    /// Opaque; stored and returned exactly as given.
    pub connection_string: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

/// Usage statistics attached to connection listings.
///
/// The gateway never inspects the target database, so these are always
/// reported as unmeasured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStats {
    pub size: Option<String>,
    pub version: Option<String>,
    pub queries: Option<u64>,
    pub tables: Option<u64>,
    pub measured: bool,
}

impl ConnectionStats {
    pub fn unavailable() -> Self {
        Self {
            size: None,
            version: None,
            queries: None,
            tables: None,
            measured: false,
        }
    }
}

/// One row of `GET /api/connections`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionListEntry {
    #[serde(flatten)]
    pub connection: DatabaseConnection,
    pub stats: ConnectionStats,
}

/// Body of `POST /api/connections`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConnectionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub dialect: String,
    #[serde(default)]
    pub connection_string: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConnectionResponse {
    pub message: String,
    pub connection: DatabaseConnection,
}

/// Connection metadata embedded in session loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRef {
    pub id: Uuid,
    pub name: String,
    pub dialect: Dialect,
}

impl From<&DatabaseConnection> for ConnectionRef {
    fn from(conn: &DatabaseConnection) -> Self {
        Self {
            id: conn.id,
            name: conn.name.clone(),
            dialect: conn.dialect,
        }
    }
}
