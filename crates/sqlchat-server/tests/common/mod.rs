//! Shared helpers for gateway integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlchat_core::{QueryTranslator, Result, SqlChatError};
use sqlchat_server::{config::Config, routes, state::AppState};
use sqlchat_types::{Dialect, GenerateRequest, GenerateResponse, RawSchema, SchemaResponse, TableSchema};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

/// How the stub translation service behaves.
#[derive(Clone)]
pub enum Upstream {
    Answer {
        explanation: String,
        sql_query: Option<String>,
    },
    Down,
    Slow,
}

pub struct StubTranslator {
    pub upstream: Mutex<Upstream>,
    pub generated: Mutex<Vec<GenerateRequest>>,
}

impl StubTranslator {
    pub fn new(upstream: Upstream) -> Self {
        Self {
            upstream: Mutex::new(upstream),
            generated: Mutex::new(Vec::new()),
        }
    }

    pub fn set(&self, upstream: Upstream) {
        *self.upstream.lock().unwrap() = upstream;
    }

    fn current(&self) -> Upstream {
        self.upstream.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryTranslator for StubTranslator {
    async fn generate(&self, request: &GenerateRequest, timeout: Duration) -> Result<GenerateResponse> {
        self.generated.lock().unwrap().push(request.clone());
        match self.current() {
            Upstream::Answer {
                explanation,
                sql_query,
            } => Ok(GenerateResponse {
                explanation,
                sql_query,
            }),
            Upstream::Down => Err(SqlChatError::UpstreamUnavailable("connection refused".into())),
            Upstream::Slow => Err(SqlChatError::UpstreamTimeout(timeout)),
        }
    }

    async fn schema(&self, _db_url: &str, _dialect: Dialect, timeout: Duration) -> Result<SchemaResponse> {
        match self.current() {
            Upstream::Answer { .. } => {
                let mut schema = RawSchema::new();
                schema.insert(
                    "customers".into(),
                    TableSchema {
                        columns: vec!["id".into(), "name".into()],
                        primary_key: vec!["id".into()],
                        foreign_keys: Default::default(),
                    },
                );
                Ok(SchemaResponse { schema })
            }
            Upstream::Down => Err(SqlChatError::UpstreamUnavailable("connection refused".into())),
            Upstream::Slow => Err(SqlChatError::UpstreamTimeout(timeout)),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub translator: Arc<StubTranslator>,
    _dir: TempDir,
}

fn key_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join("keys")
        .join(name)
}

pub fn create_test_app(upstream: Upstream) -> TestApp {
    let dir = TempDir::new().unwrap();
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        db_path: dir.path().join("test.db"),
        jwt_private_key_path: key_path("private.pem"),
        jwt_public_key_path: key_path("public.pem"),
        ..Config::default()
    };

    let translator = Arc::new(StubTranslator::new(upstream));
    let state = Arc::new(AppState::with_translator(config, translator.clone()).expect("Failed to create AppState"));
    TestApp {
        router: routes::router(state.clone()),
        state,
        translator,
        _dir: dir,
    }
}

pub fn answering(explanation: &str, sql: Option<&str>) -> Upstream {
    Upstream::Answer {
        explanation: explanation.to_string(),
        sql_query: sql.map(str::to_string),
    }
}

impl TestApp {
    /// Send a request and return status plus parsed JSON body (Null when empty).
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Sign up a user and return their token.
    pub async fn signup(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/signup",
                None,
                Some(json!({"name": "Test User", "email": email, "password": "s3cret-pass"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "signup failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Create a connection and return its id.
    pub async fn create_connection(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/connections",
                Some(token),
                Some(json!({
                    "name": name,
                    "type": "postgresql",
                    "connectionString": format!("postgres://localhost/{name}")
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create connection failed: {body}");
        body["connection"]["id"].as_str().unwrap().to_string()
    }
}
