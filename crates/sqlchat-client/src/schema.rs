//! Schema reshaping and caching for the schema tab.

use crate::store::schema_key;
use crate::{GatewayClient, Result};
use sqlchat_types::{ColumnView, RawSchema, TableView, PLACEHOLDER_COLUMN_TYPE};
use tracing::{debug, warn};

/// Turn the service's key lists into per-column constraint tags.
///
/// Column types are not reported upstream, so every column gets the
/// placeholder type.
pub fn reshape_schema(raw: &RawSchema) -> Vec<TableView> {
    raw.iter()
        .map(|(table, schema)| TableView {
            name: table.clone(),
            columns: schema
                .columns
                .iter()
                .map(|column| {
                    let mut constraints = Vec::new();
                    if schema.primary_key.contains(column) {
                        constraints.push("PRIMARY KEY".to_string());
                    }
                    if let Some(target) = schema.foreign_keys.get(column) {
                        constraints.push(format!("FOREIGN KEY ({target})"));
                    }
                    ColumnView {
                        name: column.clone(),
                        data_type: PLACEHOLDER_COLUMN_TYPE.to_string(),
                        constraints,
                    }
                })
                .collect(),
        })
        .collect()
}

/// Reshaped schemas cached in the client's local store, keyed by connection.
pub struct SchemaCache {
    client: GatewayClient,
}

impl SchemaCache {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// The reshaped schema of a connection, fetched once and then served
    /// from the local store. Failures are never cached.
    pub async fn schema(&self, connection_id: &str) -> Result<Vec<TableView>> {
        let key = schema_key(connection_id);
        if let Some(cached) = self.client.store().get(&key) {
            match serde_json::from_str(&cached) {
                Ok(tables) => return Ok(tables),
                Err(e) => {
                    warn!(target: "sqlchat::client", "Discarding unreadable cached schema for {}: {}", connection_id, e);
                    self.client.store().remove(&key);
                }
            }
        }

        let raw = self.client.fetch_schema(connection_id).await?;
        let tables = reshape_schema(&raw.schema);
        self.client.store().set(&key, serde_json::to_string(&tables)?);
        debug!(target: "sqlchat::client", "Cached schema for {} ({} tables)", connection_id, tables.len());
        Ok(tables)
    }

    /// Same as [`schema`](Self::schema), for the connection behind a session.
    pub async fn schema_for_session(&self, session_id: &str) -> Result<Vec<TableView>> {
        let detail = self.client.load_session(session_id).await?;
        self.schema(&detail.connection.id.to_string()).await
    }

    /// Drop a cached schema, e.g. after the user asks for a refresh.
    pub fn invalidate(&self, connection_id: &str) {
        self.client.store().remove(&schema_key(connection_id));
    }
}
