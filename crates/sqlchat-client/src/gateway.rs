//! Typed HTTP client for the gateway.

use crate::store::{LocalStore, AUTH_TOKEN_KEY, USER_DATA_KEY};
use crate::{ClientError, Result};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlchat_types::{
    AuthResponse, ChatTurnRequest, ChatTurnResponse, ConnectionListEntry, LoginRequest,
    SchemaResponse, SessionDetail, SignupRequest, ValidateTokenResponse,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Schema fetches can be slow on large databases.
const SCHEMA_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
    store: Arc<dyn LocalStore>,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>, store: Arc<dyn LocalStore>) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            store,
        })
    }

    pub fn store(&self) -> &Arc<dyn LocalStore> {
        &self.store
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.get(AUTH_TOKEN_KEY).is_some()
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .send(self.request(Method::POST, "/signup").json(request))
            .await?;
        self.remember(&response)?;
        Ok(response)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .send(self.request(Method::POST, "/login").json(request))
            .await?;
        self.remember(&response)?;
        Ok(response)
    }

    /// Forget the token and user data.
    pub fn logout(&self) {
        self.store.remove(AUTH_TOKEN_KEY);
        self.store.remove(USER_DATA_KEY);
    }

    /// Check the stored token with the gateway. A rejected token is forgotten.
    pub async fn validate_token(&self) -> Result<ValidateTokenResponse> {
        self.authed(Method::GET, "/validate-token", None::<&()>, None).await
    }

    pub async fn list_connections(&self) -> Result<Vec<ConnectionListEntry>> {
        self.authed(Method::GET, "/api/connections", None::<&()>, None).await
    }

    /// Raw schema of a connection as relayed by the gateway.
    pub async fn fetch_schema(&self, connection_id: &str) -> Result<SchemaResponse> {
        self.authed(
            Method::GET,
            &format!("/api/schema/{connection_id}"),
            None::<&()>,
            Some(SCHEMA_TIMEOUT),
        )
        .await
    }

    pub async fn load_session(&self, session_id: &str) -> Result<SessionDetail> {
        self.authed(Method::GET, &format!("/api/chat-sessions/{session_id}"), None::<&()>, None)
            .await
    }

    pub async fn chat(&self, request: &ChatTurnRequest) -> Result<ChatTurnResponse> {
        self.authed(Method::POST, "/api/chat", Some(request), None).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    fn remember(&self, response: &AuthResponse) -> Result<()> {
        self.store.set(AUTH_TOKEN_KEY, response.token.clone());
        self.store.set(USER_DATA_KEY, serde_json::to_string(&response.user)?);
        Ok(())
    }

    async fn authed<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        timeout: Option<Duration>,
    ) -> Result<T> {
        let token = self
            .store
            .get(AUTH_TOKEN_KEY)
            .ok_or_else(|| ClientError::Unauthorized("Not logged in".to_string()))?;

        let mut builder = self.request(method, path).bearer_auth(token);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let result = self.send(builder).await;
        if let Err(err) = &result {
            if err.requires_login() {
                warn!(target: "sqlchat::client", "Gateway rejected the stored token; clearing it");
                self.logout();
            }
        }
        result
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!(target: "sqlchat::client", "Gateway responded {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(ClientError::from_response(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(err.to_string())
    } else if err.is_connect() {
        ClientError::ServiceUnavailable(err.to_string())
    } else {
        ClientError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use mockito::Matcher;

    const AUTH_BODY: &str = r#"{
        "message": "Login successful",
        "token": "tok-123",
        "user": {"userId": "6f1c3c9e-2a4b-4c1d-9e7f-0a1b2c3d4e5f", "name": "Ada", "email": "ada@example.com", "role": "user"}
    }"#;

    fn client(url: String) -> (GatewayClient, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (GatewayClient::new(url, store.clone()).unwrap(), store)
    }

    #[tokio::test]
    async fn test_login_stores_token_and_user() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/login")
            .match_body(Matcher::Json(serde_json::json!({
                "email": "ada@example.com",
                "password": "pw"
            })))
            .with_status(200)
            .with_body(AUTH_BODY)
            .create_async()
            .await;

        let (client, store) = client(server.url());
        let response = client
            .login(&LoginRequest {
                email: "ada@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();

        assert_eq!(response.user.name, "Ada");
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("tok-123"));
        assert!(store.get(USER_DATA_KEY).unwrap().contains("ada@example.com"));
        assert!(client.is_logged_in());
    }

    #[tokio::test]
    async fn test_requests_carry_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/connections")
            .match_header("authorization", "Bearer tok-123")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let (client, store) = client(server.url());
        store.set(AUTH_TOKEN_KEY, "tok-123".into());
        let connections = client.list_connections().await.unwrap();

        mock.assert_async().await;
        assert!(connections.is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_short_circuits() {
        let server = mockito::Server::new_async().await;
        let (client, _) = client(server.url());
        let err = client.list_connections().await.unwrap_err();
        assert!(err.requires_login());
    }

    #[tokio::test]
    async fn test_rejected_token_is_cleared() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/validate-token")
            .with_status(401)
            .with_body(r#"{"error":"Invalid or expired token","code":"unauthorized"}"#)
            .create_async()
            .await;

        let (client, store) = client(server.url());
        store.set(AUTH_TOKEN_KEY, "stale".into());
        store.set(USER_DATA_KEY, "{}".into());

        let err = client.validate_token().await.unwrap_err();
        assert!(err.requires_login());
        assert!(store.get(AUTH_TOKEN_KEY).is_none());
        assert!(store.get(USER_DATA_KEY).is_none());
    }

    #[tokio::test]
    async fn test_schema_errors_are_classified() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/schema/c1")
            .with_status(503)
            .with_body(r#"{"error":"Query translation service is not available","code":"service_unavailable"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/schema/c2")
            .with_status(504)
            .with_body(r#"{"error":"Query translation service timed out","code":"timeout"}"#)
            .create_async()
            .await;

        let (client, store) = client(server.url());
        store.set(AUTH_TOKEN_KEY, "tok".into());

        assert!(matches!(
            client.fetch_schema("c1").await.unwrap_err(),
            ClientError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            client.fetch_schema("c2").await.unwrap_err(),
            ClientError::Timeout(_)
        ));
        // Upstream errors do not log the user out
        assert!(client.is_logged_in());
    }

    #[tokio::test]
    async fn test_chat_turn() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "connectionId": "c1",
                "query": "show top 5 customers"
            })))
            .with_status(200)
            .with_body(r#"{"explanation":"Here are the top 5.","sql_query":"SELECT ...","sessionId":"6f1c3c9e-2a4b-4c1d-9e7f-0a1b2c3d4e5f"}"#)
            .create_async()
            .await;

        let (client, store) = client(server.url());
        store.set(AUTH_TOKEN_KEY, "tok".into());
        let reply = client
            .chat(&ChatTurnRequest {
                connection_id: "c1".into(),
                query: "show top 5 customers".into(),
                session_id: None,
                settings: None,
            })
            .await
            .unwrap();
        assert_eq!(reply.sql_query.as_deref(), Some("SELECT ..."));
    }
}
