//! Chat turns.

use crate::error::ApiResult;
use crate::extract::{ApiJson, AuthUser};
use crate::state::AppState;
use axum::{extract::State, Json};
use sqlchat_types::{ChatTurnRequest, ChatTurnResponse};
use std::sync::Arc;

pub async fn turn(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<ChatTurnRequest>,
) -> ApiResult<Json<ChatTurnResponse>> {
    Ok(Json(state.chat.run_turn(user.user_id, &req).await?))
}
