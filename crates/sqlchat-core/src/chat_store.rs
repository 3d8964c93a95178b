//! Chat session and message persistence.
//!
//! Sessions and their messages are written inside one transaction per logical
//! operation: a bulk save or a chat turn either lands completely or not at all.
//! Messages carry a per-session `seq` assigned inside that transaction, so a
//! user message and its reply never tie on ordering.

use crate::db::{enum_col, now_ts, to_ts, ts_col, uuid_col};
use crate::{Result, SqlChatError, Store};
use rusqlite::{params, OptionalExtension, Transaction};
use sqlchat_types::{ChatMessage, ChatSession, NewMessage, SessionSummary};
use tracing::debug;
use uuid::Uuid;

const SESSION_COLUMNS: &str = "id, user_id, connection_id, title, created_at, updated_at";

/// Which session a chat turn writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnTarget {
    /// Extend a session the caller already owns.
    Existing(Uuid),
    /// Mint a new session with this title.
    New { title: String },
}

impl Store {
    /// Create a session and all of its messages atomically.
    pub fn create_session_with_messages(
        &self,
        user_id: Uuid,
        connection_id: Uuid,
        title: &str,
        messages: &[NewMessage],
    ) -> Result<ChatSession> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        ensure_connection_owned(&tx, user_id, connection_id)?;
        let session = insert_session(&tx, user_id, connection_id, title)?;
        for (i, message) in messages.iter().enumerate() {
            insert_message(&tx, session.id, i as u32 + 1, message)?;
        }

        tx.commit()?;
        debug!(
            target: "sqlchat::db",
            "Saved session {} with {} messages",
            session.id,
            messages.len()
        );
        Ok(session)
    }

    /// Persist one chat turn: the session if new, the user message and the
    /// assistant reply, plus the connection's last-used bump.
    ///
    /// Returns the id of the session written to.
    pub fn append_turn(
        &self,
        user_id: Uuid,
        connection_id: Uuid,
        target: &TurnTarget,
        user_message: &NewMessage,
        reply: &NewMessage,
    ) -> Result<Uuid> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        ensure_connection_owned(&tx, user_id, connection_id)?;
        let session_id = match target {
            TurnTarget::Existing(id) => {
                let owned: bool = tx.query_row(
                    "SELECT COUNT(*) > 0 FROM chat_sessions WHERE id = ?1 AND user_id = ?2 AND connection_id = ?3",
                    params![id.to_string(), user_id.to_string(), connection_id.to_string()],
                    |row| row.get(0),
                )?;
                if !owned {
                    return Err(SqlChatError::NotFound("Session"));
                }
                *id
            }
            TurnTarget::New { title } => insert_session(&tx, user_id, connection_id, title)?.id,
        };

        let next: i64 = tx.query_row(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM chat_messages WHERE session_id = ?1",
            params![session_id.to_string()],
            |row| row.get(0),
        )?;
        insert_message(&tx, session_id, next as u32, user_message)?;
        insert_message(&tx, session_id, next as u32 + 1, reply)?;

        let now = now_ts();
        tx.execute(
            "UPDATE chat_sessions SET updated_at = ?1 WHERE id = ?2",
            params![now, session_id.to_string()],
        )?;
        tx.execute(
            "UPDATE database_connections SET last_used = ?1 WHERE id = ?2 AND user_id = ?3",
            params![now, connection_id.to_string(), user_id.to_string()],
        )?;

        tx.commit()?;
        Ok(session_id)
    }

    /// A session owned by the user.
    pub fn get_session(&self, user_id: Uuid, session_id: Uuid) -> Result<Option<ChatSession>> {
        let conn = self.conn()?;
        let session = conn
            .query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM chat_sessions WHERE id = ?1 AND user_id = ?2"),
                params![session_id.to_string(), user_id.to_string()],
                row_to_session,
            )
            .optional()?;
        Ok(session)
    }

    /// Messages of a session in conversation order.
    pub fn list_messages(&self, session_id: Uuid) -> Result<Vec<ChatMessage>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, session_id, seq, role, content, sql_query, created_at
            FROM chat_messages
            WHERE session_id = ?1
            ORDER BY seq ASC, created_at ASC, id ASC
            "#,
        )?;
        let messages = stmt
            .query_map(params![session_id.to_string()], |row| {
                let seq: i64 = row.get(2)?;
                Ok(ChatMessage {
                    id: uuid_col(row, 0)?,
                    session_id: uuid_col(row, 1)?,
                    seq: seq as u32,
                    role: enum_col(row, 3)?,
                    content: row.get(4)?,
                    sql: row.get(5)?,
                    created_at: ts_col(row, 6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(messages)
    }

    /// Session summaries for a user, optionally limited to one connection,
    /// most recently updated first.
    pub fn list_session_summaries(
        &self,
        user_id: Uuid,
        connection_id: Option<Uuid>,
    ) -> Result<Vec<SessionSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                s.id, s.connection_id, c.name, s.title, s.created_at, s.updated_at,
                (SELECT m.content FROM chat_messages m
                 WHERE m.session_id = s.id AND m.role = 'user'
                 ORDER BY m.seq ASC LIMIT 1) AS preview,
                (SELECT COUNT(*) FROM chat_messages m WHERE m.session_id = s.id) AS message_count
            FROM chat_sessions s
            JOIN database_connections c ON c.id = s.connection_id
            WHERE s.user_id = ?1 AND (?2 IS NULL OR s.connection_id = ?2)
            ORDER BY s.updated_at DESC, s.created_at DESC, s.rowid DESC
            "#,
        )?;
        let summaries = stmt
            .query_map(
                params![user_id.to_string(), connection_id.map(|id| id.to_string())],
                |row| {
                    let count: i64 = row.get(7)?;
                    Ok(SessionSummary {
                        id: uuid_col(row, 0)?,
                        connection_id: uuid_col(row, 1)?,
                        connection_name: row.get(2)?,
                        title: row.get(3)?,
                        created_at: ts_col(row, 4)?,
                        updated_at: ts_col(row, 5)?,
                        preview: row.get(6)?,
                        message_count: count as u32,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    /// Delete a session and its messages.
    pub fn delete_session(&self, user_id: Uuid, session_id: Uuid) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM chat_sessions WHERE id = ?1 AND user_id = ?2",
            params![session_id.to_string(), user_id.to_string()],
        )?;
        if deleted == 0 {
            return Err(SqlChatError::NotFound("Session"));
        }
        Ok(())
    }
}

fn ensure_connection_owned(tx: &Transaction, user_id: Uuid, connection_id: Uuid) -> Result<()> {
    let owned: bool = tx.query_row(
        "SELECT COUNT(*) > 0 FROM database_connections WHERE id = ?1 AND user_id = ?2",
        params![connection_id.to_string(), user_id.to_string()],
        |row| row.get(0),
    )?;
    if owned {
        Ok(())
    } else {
        Err(SqlChatError::NotFound("Connection"))
    }
}

fn insert_session(
    tx: &Transaction,
    user_id: Uuid,
    connection_id: Uuid,
    title: &str,
) -> Result<ChatSession> {
    let now = chrono::Utc::now();
    let session = ChatSession {
        id: Uuid::new_v4(),
        user_id,
        connection_id,
        title: title.to_string(),
        created_at: now,
        updated_at: now,
    };
    let ts = to_ts(now);
    tx.execute(
        &format!("INSERT INTO chat_sessions ({SESSION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
        params![
            session.id.to_string(),
            user_id.to_string(),
            connection_id.to_string(),
            session.title,
            ts,
            ts,
        ],
    )?;
    Ok(session)
}

fn insert_message(tx: &Transaction, session_id: Uuid, seq: u32, message: &NewMessage) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO chat_messages (id, session_id, seq, role, content, sql_query, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            Uuid::new_v4().to_string(),
            session_id.to_string(),
            seq as i64,
            message.role.as_str(),
            message.content,
            message.sql,
            now_ts(),
        ],
    )?;
    Ok(())
}

fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<ChatSession> {
    Ok(ChatSession {
        id: uuid_col(row, 0)?,
        user_id: uuid_col(row, 1)?,
        connection_id: uuid_col(row, 2)?,
        title: row.get(3)?,
        created_at: ts_col(row, 4)?,
        updated_at: ts_col(row, 5)?,
    })
}
