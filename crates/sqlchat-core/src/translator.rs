//! Client for the external natural-language-to-SQL service.
//!
//! Every call is a single attempt with an explicit timeout. Failures are
//! classified so callers can tell an unreachable service from a slow one.

use crate::{Result, SqlChatError};
use async_trait::async_trait;
use sqlchat_types::{Dialect, GenerateRequest, GenerateResponse, SchemaResponse};
use std::time::Duration;
use tracing::{debug, warn};

/// The operations the gateway needs from the translation service.
#[async_trait]
pub trait QueryTranslator: Send + Sync {
    /// Translate a question into an explanation and optional SQL.
    async fn generate(&self, request: &GenerateRequest, timeout: Duration) -> Result<GenerateResponse>;

    /// Describe the tables reachable through a connection string.
    async fn schema(&self, db_url: &str, dialect: Dialect, timeout: Duration) -> Result<SchemaResponse>;
}

/// HTTP implementation of [`QueryTranslator`].
#[derive(Clone)]
pub struct TranslatorClient {
    base_url: String,
    http: reqwest::Client,
}

impl TranslatorClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SqlChatError::UpstreamUnavailable(e.to_string()))?;
        Ok(Self { base_url, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl QueryTranslator for TranslatorClient {
    async fn generate(&self, request: &GenerateRequest, timeout: Duration) -> Result<GenerateResponse> {
        let url = self.endpoint("generate");
        debug!(target: "sqlchat::relay", "POST {} (dialect {})", url, request.dialect);

        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        decode(response, timeout).await
    }

    async fn schema(&self, db_url: &str, dialect: Dialect, timeout: Duration) -> Result<SchemaResponse> {
        let url = self.endpoint("schema");
        debug!(target: "sqlchat::relay", "GET {} (dialect {})", url, dialect);

        let response = self
            .http
            .get(&url)
            .timeout(timeout)
            .query(&[("db_url", db_url), ("dialect", dialect.wire_name())])
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        decode(response, timeout).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    timeout: Duration,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        // The body may echo the connection string; keep it out of the error
        warn!(
            target: "sqlchat::relay",
            "Translation service returned {} ({} byte body)",
            status,
            body.len()
        );
        return Err(SqlChatError::UpstreamFailure(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        )));
    }

    response.json::<T>().await.map_err(|e| {
        if e.is_timeout() {
            SqlChatError::UpstreamTimeout(timeout)
        } else {
            SqlChatError::UpstreamFailure(format!("malformed response: {e}"))
        }
    })
}

fn classify(err: reqwest::Error, timeout: Duration) -> SqlChatError {
    if err.is_timeout() {
        SqlChatError::UpstreamTimeout(timeout)
    } else if err.is_connect() {
        SqlChatError::UpstreamUnavailable(err.to_string())
    } else if err.is_decode() {
        SqlChatError::UpstreamFailure(err.to_string())
    } else {
        SqlChatError::UpstreamUnavailable(err.to_string())
    }
}
