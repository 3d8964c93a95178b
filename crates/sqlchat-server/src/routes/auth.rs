//! Signup, login and token validation.

use crate::error::ApiResult;
use crate::extract::{ApiJson, AuthUser};
use crate::state::AppState;
use axum::{extract::State, Json};
use sqlchat_types::{AuthResponse, LoginRequest, SignupRequest, ValidateTokenResponse};
use std::sync::Arc;

pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    Ok(Json(state.accounts.signup(&req).await?))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    Ok(Json(state.accounts.login(&req).await?))
}

pub async fn validate(AuthUser(identity): AuthUser) -> Json<ValidateTokenResponse> {
    Json(ValidateTokenResponse {
        message: "Token is valid".to_string(),
        user: identity,
    })
}
