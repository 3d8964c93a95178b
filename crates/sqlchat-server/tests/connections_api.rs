//! Integration tests for the connection registry and schema proxy.

mod common;

use axum::http::{Method, StatusCode};
use common::{answering, create_test_app, Upstream};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_create_and_list_connections() {
    let app = create_test_app(answering("ok", None));
    let token = app.signup("ada@example.com").await;

    let (status, created) = app
        .send(
            Method::POST,
            "/api/connections",
            Some(&token),
            Some(json!({"name": "warehouse", "type": "mysql", "connectionString": "mysql://h/w"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Connection created successfully");
    assert_eq!(created["connection"]["dialect"], "mysql");
    assert_eq!(created["connection"]["connectionString"], "mysql://h/w");
    assert_eq!(created["connection"]["isActive"], true);

    let (status, listed) = app.send(Method::GET, "/api/connections", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = listed.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "warehouse");
    assert_eq!(entries[0]["stats"]["measured"], false);
    assert!(entries[0]["stats"]["tables"].is_null());
}

#[tokio::test]
async fn test_create_validation() {
    let app = create_test_app(answering("ok", None));
    let token = app.signup("ada@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/connections",
            Some(&token),
            Some(json!({"name": "x", "type": "oracle", "connectionString": "oracle://h"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid database type");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/connections",
            Some(&token),
            Some(json!({"name": "x", "type": "mysql"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
async fn test_delete_foreign_and_missing_look_identical() {
    let app = create_test_app(answering("ok", None));
    let alice = app.signup("alice@example.com").await;
    let bob = app.signup("bob@example.com").await;
    let alice_conn = app.create_connection(&alice, "alice-db").await;

    let (foreign_status, foreign_body) = app
        .send(Method::DELETE, &format!("/api/connections/{alice_conn}"), Some(&bob), None)
        .await;
    let (missing_status, missing_body) = app
        .send(
            Method::DELETE,
            &format!("/api/connections/{}", Uuid::new_v4()),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(foreign_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(foreign_body, missing_body);

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/connections/{alice_conn}"), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Connection deleted successfully");
}

#[tokio::test]
async fn test_schema_proxy_and_upstream_errors() {
    let app = create_test_app(answering("ok", None));
    let token = app.signup("ada@example.com").await;
    let connection_id = app.create_connection(&token, "shop").await;
    let uri = format!("/api/schema/{connection_id}");

    let (status, body) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schema"]["customers"]["primary_key"], json!(["id"]));

    app.translator.set(Upstream::Down);
    let (status, body) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");

    app.translator.set(Upstream::Slow);
    let (status, body) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["code"], "timeout");
}

#[tokio::test]
async fn test_reconnect_only_updates_on_success() {
    let app = create_test_app(Upstream::Down);
    let token = app.signup("ada@example.com").await;
    let connection_id = app.create_connection(&token, "shop").await;
    let uri = format!("/api/connections/{connection_id}/reconnect");

    let (status, _) = app.send(Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let (_, listed) = app.send(Method::GET, "/api/connections", Some(&token), None).await;
    assert!(listed[0]["lastUsed"].is_null());

    app.translator.set(answering("ok", None));
    let (status, body) = app.send(Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isActive"], true);
    assert!(body["lastUsed"].is_string());
}
