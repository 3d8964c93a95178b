//! Saved database connection routes.

use crate::error::ApiResult;
use crate::extract::{ApiJson, AuthUser};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlchat_core::parse_id;
use sqlchat_types::{
    ConnectionListEntry, CreateConnectionRequest, CreateConnectionResponse, DatabaseConnection,
    MessageResponse,
};
use std::sync::Arc;

pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<CreateConnectionRequest>,
) -> ApiResult<(StatusCode, Json<CreateConnectionResponse>)> {
    let connection = state.registry.create(user.user_id, &req)?;
    Ok((
        StatusCode::CREATED,
        Json(CreateConnectionResponse {
            message: "Connection created successfully".to_string(),
            connection,
        }),
    ))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<ConnectionListEntry>>> {
    Ok(Json(state.registry.list(user.user_id)?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(connection_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&connection_id, "Connection")?;
    state.registry.delete(user.user_id, id)?;
    Ok(Json(MessageResponse::new("Connection deleted successfully")))
}

pub async fn reconnect(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(connection_id): Path<String>,
) -> ApiResult<Json<DatabaseConnection>> {
    let id = parse_id(&connection_id, "Connection")?;
    let connection = state
        .registry
        .reconnect(user.user_id, id, state.config.reconnect_timeout())
        .await?;
    Ok(Json(connection))
}
