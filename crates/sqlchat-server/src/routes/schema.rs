//! Schema proxy.

use crate::error::ApiResult;
use crate::extract::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use sqlchat_core::parse_id;
use sqlchat_types::SchemaResponse;
use std::sync::Arc;
use tracing::debug;

/// Relay the translation service's description of a connection's tables.
pub async fn fetch(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(connection_id): Path<String>,
) -> ApiResult<Json<SchemaResponse>> {
    let id = parse_id(&connection_id, "Connection")?;
    let schema = state
        .registry
        .schema(user.user_id, id, state.config.schema_timeout())
        .await?;
    debug!(target: "sqlchat::api", "Schema for {} has {} tables", id, schema.schema.len());
    Ok(Json(schema))
}
