//! User settings routes.

use crate::error::ApiResult;
use crate::extract::{ApiJson, AuthUser};
use crate::state::AppState;
use axum::{extract::State, Json};
use sqlchat_types::{SettingsUpdate, UserSettings};
use std::sync::Arc;

pub async fn get(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<UserSettings>> {
    Ok(Json(state.accounts.settings(user.user_id)?))
}

/// Merge a partial update and return the full settings.
pub async fn update(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(update): ApiJson<SettingsUpdate>,
) -> ApiResult<Json<UserSettings>> {
    Ok(Json(state.accounts.update_settings(user.user_id, &update)?))
}
