//! HTTP route handlers.

pub mod auth;
pub mod chat;
pub mod connections;
pub mod profile;
pub mod schema;
pub mod sessions;
pub mod settings;

use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// The full gateway router.
pub fn router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/connections", get(connections::list).post(connections::create))
        .route("/connections/{connection_id}", delete(connections::delete))
        .route("/connections/{connection_id}/reconnect", post(connections::reconnect))
        .route("/schema/{connection_id}", get(schema::fetch))
        .route("/chat", post(chat::turn))
        .route("/chat-sessions", get(sessions::list).post(sessions::save))
        .route("/chat-sessions/{session_id}", get(sessions::load).delete(sessions::delete))
        .route(
            "/chat-sessions/connection/{connection_id}",
            get(sessions::list_for_connection),
        )
        .route("/settings", get(settings::get).put(settings::update))
        .route("/profile", get(profile::get).put(profile::update));

    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/validate-token", get(auth::validate))
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
