//! Connection registry: saved database connections and their reachability.

use crate::{QueryTranslator, Result, SqlChatError, Store};
use chrono::Utc;
use sqlchat_types::{
    ConnectionListEntry, ConnectionStats, CreateConnectionRequest, DatabaseConnection, Dialect,
    SchemaResponse,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Owns the connection lifecycle for every user.
pub struct ConnectionRegistry {
    store: Arc<Store>,
    translator: Arc<dyn QueryTranslator>,
}

impl ConnectionRegistry {
    pub fn new(store: Arc<Store>, translator: Arc<dyn QueryTranslator>) -> Self {
        Self { store, translator }
    }

    /// Validate and save a new connection, active from the start.
    pub fn create(&self, user_id: Uuid, request: &CreateConnectionRequest) -> Result<DatabaseConnection> {
        let name = request.name.trim();
        let dialect = request.dialect.trim();
        let connection_string = request.connection_string.trim();
        if name.is_empty() || dialect.is_empty() || connection_string.is_empty() {
            return Err(SqlChatError::missing_fields());
        }
        let dialect: Dialect = dialect
            .parse()
            .map_err(|_| SqlChatError::Validation("Invalid database type".to_string()))?;

        let connection = DatabaseConnection {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            dialect,
            connection_string: connection_string.to_string(),
            is_active: true,
            created_at: Utc::now(),
            last_used: None,
        };
        self.store.insert_connection(&connection)?;

        info!(
            target: "sqlchat::api",
            "Created {} connection {} for user {}",
            connection.dialect,
            connection.id,
            user_id
        );
        Ok(connection)
    }

    /// The caller's connections with usage statistics.
    ///
    /// Statistics are never measured; every entry says so explicitly.
    pub fn list(&self, user_id: Uuid) -> Result<Vec<ConnectionListEntry>> {
        Ok(self
            .store
            .list_connections(user_id)?
            .into_iter()
            .map(|connection| ConnectionListEntry {
                connection,
                stats: ConnectionStats::unavailable(),
            })
            .collect())
    }

    pub fn get(&self, user_id: Uuid, id: Uuid) -> Result<DatabaseConnection> {
        self.store
            .get_connection(user_id, id)?
            .ok_or(SqlChatError::NotFound("Connection"))
    }

    pub fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.store.delete_connection(user_id, id)?;
        info!(target: "sqlchat::api", "Deleted connection {} for user {}", id, user_id);
        Ok(())
    }

    /// Probe the connection through the translation service and reactivate it.
    ///
    /// Nothing changes when the probe fails.
    pub async fn reconnect(&self, user_id: Uuid, id: Uuid, timeout: Duration) -> Result<DatabaseConnection> {
        let connection = self.get(user_id, id)?;
        if let Err(e) = self
            .translator
            .schema(&connection.connection_string, connection.dialect, timeout)
            .await
        {
            warn!(target: "sqlchat::relay", "Reconnect probe for {} failed: {}", id, e);
            return Err(e);
        }
        let connection = self.store.activate_connection(user_id, id)?;
        info!(target: "sqlchat::api", "Reconnected {}", id);
        Ok(connection)
    }

    /// Raw schema of an owned connection, proxied from the translation service.
    pub async fn schema(&self, user_id: Uuid, id: Uuid, timeout: Duration) -> Result<SchemaResponse> {
        let connection = self.get(user_id, id)?;
        self.translator
            .schema(&connection.connection_string, connection.dialect, timeout)
            .await
    }
}
