//! Chat session routes.

use crate::error::ApiResult;
use crate::extract::{ApiJson, AuthUser};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlchat_types::{
    MessageResponse, SaveSessionRequest, SaveSessionResponse, SessionDetail, SessionListResponse,
};
use std::sync::Arc;

pub async fn save(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<SaveSessionRequest>,
) -> ApiResult<(StatusCode, Json<SaveSessionResponse>)> {
    let session = state.chat.save_session(user.user_id, &req)?;
    Ok((
        StatusCode::CREATED,
        Json(SaveSessionResponse {
            message: "Chat session saved successfully".to_string(),
            session_id: session.id,
        }),
    ))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<SessionListResponse>> {
    let sessions = state.chat.list_sessions(user.user_id)?;
    Ok(Json(SessionListResponse { sessions }))
}

pub async fn list_for_connection(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(connection_id): Path<String>,
) -> ApiResult<Json<SessionListResponse>> {
    let sessions = state.chat.list_for_connection(user.user_id, &connection_id)?;
    Ok(Json(SessionListResponse { sessions }))
}

pub async fn load(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionDetail>> {
    Ok(Json(state.chat.load_session(user.user_id, &session_id)?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(session_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.chat.delete_session(user.user_id, &session_id)?;
    Ok(Json(MessageResponse::new("Chat session deleted successfully")))
}
