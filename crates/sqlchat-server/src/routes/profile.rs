//! Profile routes.

use crate::error::ApiResult;
use crate::extract::{ApiJson, AuthUser};
use crate::state::AppState;
use axum::{extract::State, Json};
use sqlchat_types::{ProfileUpdate, UserProfile};
use std::sync::Arc;

pub async fn get(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.accounts.profile(user.user_id)?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.accounts.update_profile(user.user_id, &update)?))
}
