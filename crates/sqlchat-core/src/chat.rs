//! Chat session manager: turns, bulk saves and session reads.

use crate::{parse_id, QueryTranslator, Result, SqlChatError, Store, TurnTarget};
use sqlchat_types::{
    session_title, ChatSession, ChatTurnRequest, ChatTurnResponse, ConnectionRef,
    GenerateRequest, GenerateSettings, MessageRole, NewMessage, SaveSessionRequest,
    SessionDetail, SessionSummary, QUERY_TIMEOUT_RANGE,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Combines the query relay with session persistence.
pub struct ChatService {
    store: Arc<Store>,
    translator: Arc<dyn QueryTranslator>,
    default_timeout: Duration,
}

impl ChatService {
    pub fn new(store: Arc<Store>, translator: Arc<dyn QueryTranslator>, default_timeout: Duration) -> Self {
        Self {
            store,
            translator,
            default_timeout,
        }
    }

    /// Run one chat turn.
    ///
    /// The translation service is called first; the session (if new), the
    /// user message and the reply are then written in a single transaction.
    /// A failed relay call leaves nothing behind.
    pub async fn run_turn(&self, user_id: Uuid, request: &ChatTurnRequest) -> Result<ChatTurnResponse> {
        let query = request.query.trim();
        if query.is_empty() || request.connection_id.trim().is_empty() {
            return Err(SqlChatError::missing_fields());
        }

        let connection_id = parse_id(&request.connection_id, "Connection")?;
        let connection = self
            .store
            .get_connection(user_id, connection_id)?
            .ok_or(SqlChatError::NotFound("Connection"))?;

        let target = match request.session_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                let session_id = parse_id(raw, "Session")?;
                match self.store.get_session(user_id, session_id)? {
                    Some(session) if session.connection_id == connection_id => {
                        TurnTarget::Existing(session_id)
                    }
                    _ => return Err(SqlChatError::NotFound("Session")),
                }
            }
            _ => TurnTarget::New {
                title: session_title(query),
            },
        };

        let stored = self.store.find_settings(user_id)?;
        let turn = request.settings.unwrap_or_default();
        let show_sql = turn
            .show_sql_queries
            .or(stored.as_ref().map(|s| s.show_sql_queries))
            .unwrap_or(true);
        let timeout_secs = turn
            .query_timeout
            .filter(|secs| QUERY_TIMEOUT_RANGE.contains(secs))
            .or(stored.as_ref().map(|s| s.query_timeout))
            .unwrap_or(self.default_timeout.as_secs());

        let generate = GenerateRequest {
            query: query.to_string(),
            db_url: connection.connection_string.clone(),
            dialect: connection.dialect.wire_name().to_string(),
            settings: GenerateSettings {
                query_timeout: timeout_secs,
                show_sql_queries: show_sql,
            },
        };
        let reply = self
            .translator
            .generate(&generate, Duration::from_secs(timeout_secs))
            .await
            .map_err(|e| {
                warn!(target: "sqlchat::chat", "Relay failed for connection {}: {}", connection_id, e);
                e
            })?;

        // Withheld SQL is never stored, not just hidden
        let sql = if show_sql { reply.sql_query } else { None };

        let session_id = self.store.append_turn(
            user_id,
            connection_id,
            &target,
            &NewMessage::user(query),
            &NewMessage::assistant(reply.explanation.clone(), sql.clone()),
        )?;

        debug!(
            target: "sqlchat::chat",
            "Turn stored in session {} ({})",
            session_id,
            if matches!(target, TurnTarget::New { .. }) { "new" } else { "existing" }
        );

        Ok(ChatTurnResponse {
            explanation: reply.explanation,
            sql_query: sql,
            session_id,
        })
    }

    /// Save a whole conversation at once.
    pub fn save_session(&self, user_id: Uuid, request: &SaveSessionRequest) -> Result<ChatSession> {
        let title = request.title.trim();
        let Some(inputs) = request.messages.as_ref() else {
            return Err(SqlChatError::missing_fields());
        };
        if request.connection_id.trim().is_empty() || title.is_empty() {
            return Err(SqlChatError::missing_fields());
        }
        let connection_id = parse_id(&request.connection_id, "Connection")?;

        let messages = inputs
            .iter()
            .map(|input| {
                let role: MessageRole = input
                    .role
                    .parse()
                    .map_err(|e: sqlchat_types::ParseEnumError| SqlChatError::Validation(e.to_string()))?;
                Ok(NewMessage {
                    role,
                    content: input.content.clone(),
                    sql: input.sql.clone().filter(|sql| !sql.is_empty()),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let session = self
            .store
            .create_session_with_messages(user_id, connection_id, title, &messages)?;
        info!(
            target: "sqlchat::chat",
            "Saved session {} with {} messages",
            session.id,
            messages.len()
        );
        Ok(session)
    }

    /// A session with its connection and ordered messages.
    pub fn load_session(&self, user_id: Uuid, session_id: &str) -> Result<SessionDetail> {
        let session_id = parse_id(session_id, "Session")?;
        let session = self
            .store
            .get_session(user_id, session_id)?
            .ok_or(SqlChatError::NotFound("Session"))?;
        let connection = self
            .store
            .get_connection(user_id, session.connection_id)?
            .ok_or(SqlChatError::NotFound("Session"))?;
        let messages = self.store.list_messages(session.id)?;

        Ok(SessionDetail {
            connection: ConnectionRef::from(&connection),
            session,
            messages,
        })
    }

    pub fn list_sessions(&self, user_id: Uuid) -> Result<Vec<SessionSummary>> {
        self.store.list_session_summaries(user_id, None)
    }

    /// Sessions under one of the caller's connections.
    pub fn list_for_connection(&self, user_id: Uuid, connection_id: &str) -> Result<Vec<SessionSummary>> {
        let connection_id = parse_id(connection_id, "Connection")?;
        if self.store.get_connection(user_id, connection_id)?.is_none() {
            return Err(SqlChatError::NotFound("Connection"));
        }
        self.store.list_session_summaries(user_id, Some(connection_id))
    }

    pub fn delete_session(&self, user_id: Uuid, session_id: &str) -> Result<()> {
        let session_id = parse_id(session_id, "Session")?;
        self.store.delete_session(user_id, session_id)?;
        info!(target: "sqlchat::chat", "Deleted session {}", session_id);
        Ok(())
    }
}
