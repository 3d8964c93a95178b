//! Integration tests for chat turns and chat session persistence.

mod common;

use axum::http::{Method, StatusCode};
use common::{answering, create_test_app, Upstream};
use serde_json::json;

#[tokio::test]
async fn test_first_turn_returns_new_session_and_persists_pair() {
    let app = create_test_app(answering("Here are the top 5.", Some("SELECT ...")));
    let token = app.signup("ada@example.com").await;
    let connection_id = app.create_connection(&token, "shop").await;

    let (status, reply) = app
        .send(
            Method::POST,
            "/api/chat",
            Some(&token),
            Some(json!({
                "connectionId": connection_id,
                "query": "show top 5 customers",
                "settings": {"show_sql_queries": true}
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["explanation"], "Here are the top 5.");
    assert_eq!(reply["sql_query"], "SELECT ...");
    let session_id = reply["sessionId"].as_str().unwrap();

    let (status, loaded) = app
        .send(Method::GET, &format!("/api/chat-sessions/{session_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded["connection"]["id"], connection_id.as_str());
    assert_eq!(loaded["session"]["title"], "show top 5 customers");

    let messages = loaded["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "show top 5 customers");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "Here are the top 5.");
    assert_eq!(messages[1]["sql"], "SELECT ...");

    let sent = app.translator.generated.lock().unwrap()[0].clone();
    assert_eq!(sent.dialect, "POSTGRESQL");
    assert!(sent.settings.show_sql_queries);
}

#[tokio::test]
async fn test_hidden_sql_is_neither_returned_nor_stored() {
    let app = create_test_app(answering("Counted.", Some("SELECT COUNT(*) FROM orders")));
    let token = app.signup("ada@example.com").await;
    let connection_id = app.create_connection(&token, "shop").await;

    let (status, reply) = app
        .send(
            Method::POST,
            "/api/chat",
            Some(&token),
            Some(json!({
                "connectionId": connection_id,
                "query": "how many orders?",
                "settings": {"show_sql_queries": false, "query_timeout": 45}
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(reply.get("sql_query").is_none());

    let session_id = reply["sessionId"].as_str().unwrap();
    let (_, loaded) = app
        .send(Method::GET, &format!("/api/chat-sessions/{session_id}"), Some(&token), None)
        .await;
    for message in loaded["messages"].as_array().unwrap() {
        assert!(message.get("sql").map_or(true, |sql| sql.is_null()));
    }

    let sent = app.translator.generated.lock().unwrap()[0].clone();
    assert_eq!(sent.settings.query_timeout, 45);
}

#[tokio::test]
async fn test_follow_up_turn_and_listing() {
    let app = create_test_app(answering("Sure.", None));
    let token = app.signup("ada@example.com").await;
    let connection_id = app.create_connection(&token, "shop").await;

    let (_, first) = app
        .send(
            Method::POST,
            "/api/chat",
            Some(&token),
            Some(json!({"connectionId": connection_id, "query": "first question"})),
        )
        .await;
    let session_id = first["sessionId"].as_str().unwrap().to_string();

    let (status, second) = app
        .send(
            Method::POST,
            "/api/chat",
            Some(&token),
            Some(json!({
                "connectionId": connection_id,
                "query": "second question",
                "sessionId": session_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["sessionId"], session_id.as_str());

    let (status, listed) = app.send(Method::GET, "/api/chat-sessions", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let sessions = listed["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["messageCount"], 4);
    assert_eq!(sessions[0]["preview"], "first question");
    assert_eq!(sessions[0]["connectionName"], "shop");

    let (status, by_connection) = app
        .send(
            Method::GET,
            &format!("/api/chat-sessions/connection/{connection_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_connection["sessions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upstream_failures_persist_nothing() {
    let app = create_test_app(Upstream::Down);
    let token = app.signup("ada@example.com").await;
    let connection_id = app.create_connection(&token, "shop").await;
    let turn = json!({"connectionId": connection_id, "query": "anything"});

    let (status, body) = app
        .send(Method::POST, "/api/chat", Some(&token), Some(turn.clone()))
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");

    app.translator.set(Upstream::Slow);
    let (status, body) = app.send(Method::POST, "/api/chat", Some(&token), Some(turn)).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["code"], "timeout");

    let (_, listed) = app.send(Method::GET, "/api/chat-sessions", Some(&token), None).await;
    assert!(listed["sessions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_users_sessions_are_not_found() {
    let app = create_test_app(answering("Sure.", None));
    let alice = app.signup("alice@example.com").await;
    let bob = app.signup("bob@example.com").await;
    let alice_conn = app.create_connection(&alice, "alice-db").await;
    let bob_conn = app.create_connection(&bob, "bob-db").await;

    let (_, reply) = app
        .send(
            Method::POST,
            "/api/chat",
            Some(&alice),
            Some(json!({"connectionId": alice_conn, "query": "private"})),
        )
        .await;
    let alice_session = reply["sessionId"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(Method::GET, &format!("/api/chat-sessions/{alice_session}"), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Bob cannot append to Alice's session through his own connection
    let (status, _) = app
        .send(
            Method::POST,
            "/api/chat",
            Some(&bob),
            Some(json!({"connectionId": bob_conn, "query": "sneak", "sessionId": alice_session})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/chat-sessions/{alice_session}"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::GET, "/api/chat-sessions/not-a-uuid", Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_save_load_and_delete() {
    let app = create_test_app(answering("unused", None));
    let token = app.signup("ada@example.com").await;
    let connection_id = app.create_connection(&token, "shop").await;

    let (status, saved) = app
        .send(
            Method::POST,
            "/api/chat-sessions",
            Some(&token),
            Some(json!({
                "connectionId": connection_id,
                "title": "Orders",
                "messages": [
                    {"role": "system", "content": "Connected to shop"},
                    {"role": "user", "content": "how many orders?"},
                    {"role": "assistant", "content": "42", "sql": "SELECT COUNT(*) FROM orders"}
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["message"], "Chat session saved successfully");
    let session_id = saved["sessionId"].as_str().unwrap().to_string();

    let (_, loaded) = app
        .send(Method::GET, &format!("/api/chat-sessions/{session_id}"), Some(&token), None)
        .await;
    let roles: Vec<&str> = loaded["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["system", "user", "assistant"]);
    assert_eq!(loaded["messages"][2]["sql"], "SELECT COUNT(*) FROM orders");

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/chat-sessions/{session_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .send(Method::GET, &format!("/api/chat-sessions/{session_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_save_rejects_invalid_role_without_partial_state() {
    let app = create_test_app(answering("unused", None));
    let token = app.signup("ada@example.com").await;
    let connection_id = app.create_connection(&token, "shop").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/chat-sessions",
            Some(&token),
            Some(json!({
                "connectionId": connection_id,
                "title": "Broken",
                "messages": [
                    {"role": "user", "content": "fine"},
                    {"role": "narrator", "content": "not fine"}
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/chat-sessions",
            Some(&token),
            Some(json!({"connectionId": connection_id, "title": "No messages field"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");

    let (_, listed) = app.send(Method::GET, "/api/chat-sessions", Some(&token), None).await;
    assert!(listed["sessions"].as_array().unwrap().is_empty());
}
