//! Saved connection rows. Every query is scoped by the owning user.

use crate::db::{enum_col, now_ts, opt_ts_col, to_ts, ts_col, uuid_col};
use crate::{Result, SqlChatError, Store};
use rusqlite::{params, OptionalExtension};
use sqlchat_types::DatabaseConnection;
use uuid::Uuid;

const CONNECTION_COLUMNS: &str =
    "id, user_id, name, dialect, connection_string, is_active, created_at, last_used";

impl Store {
    pub fn insert_connection(&self, connection: &DatabaseConnection) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO database_connections (
                id, user_id, name, dialect, connection_string, is_active, created_at, last_used
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                connection.id.to_string(),
                connection.user_id.to_string(),
                connection.name,
                connection.dialect.as_str(),
                connection.connection_string,
                connection.is_active,
                to_ts(connection.created_at),
                connection.last_used.map(to_ts),
            ],
        )?;
        Ok(())
    }

    pub fn get_connection(&self, user_id: Uuid, id: Uuid) -> Result<Option<DatabaseConnection>> {
        let conn = self.conn()?;
        let connection = conn
            .query_row(
                &format!(
                    "SELECT {CONNECTION_COLUMNS} FROM database_connections WHERE id = ?1 AND user_id = ?2"
                ),
                params![id.to_string(), user_id.to_string()],
                row_to_connection,
            )
            .optional()?;
        Ok(connection)
    }

    /// All of a user's connections, most recently used first, then newest first.
    pub fn list_connections(&self, user_id: Uuid) -> Result<Vec<DatabaseConnection>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {CONNECTION_COLUMNS} FROM database_connections
            WHERE user_id = ?1
            ORDER BY last_used IS NULL, last_used DESC, created_at DESC
            "#
        ))?;
        let connections = stmt
            .query_map(params![user_id.to_string()], row_to_connection)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(connections)
    }

    /// Delete a connection (and, by cascade, its sessions and messages).
    pub fn delete_connection(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM database_connections WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        if deleted == 0 {
            return Err(SqlChatError::NotFound("Connection"));
        }
        Ok(())
    }

    /// Mark a connection active and bump its last-used time.
    pub fn activate_connection(&self, user_id: Uuid, id: Uuid) -> Result<DatabaseConnection> {
        {
            let conn = self.conn()?;
            let changed = conn.execute(
                "UPDATE database_connections SET is_active = 1, last_used = ?1 WHERE id = ?2 AND user_id = ?3",
                params![now_ts(), id.to_string(), user_id.to_string()],
            )?;
            if changed == 0 {
                return Err(SqlChatError::NotFound("Connection"));
            }
        }
        self.get_connection(user_id, id)?
            .ok_or(SqlChatError::NotFound("Connection"))
    }
}

fn row_to_connection(row: &rusqlite::Row) -> rusqlite::Result<DatabaseConnection> {
    Ok(DatabaseConnection {
        id: uuid_col(row, 0)?,
        user_id: uuid_col(row, 1)?,
        name: row.get(2)?,
        dialect: enum_col(row, 3)?,
        connection_string: row.get(4)?,
        is_active: row.get(5)?,
        created_at: ts_col(row, 6)?,
        last_used: opt_ts_col(row, 7)?,
    })
}
