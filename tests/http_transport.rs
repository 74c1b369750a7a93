//! HTTP transport integration tests — prepared requests against a local echo server.

use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use openapi_mcp_core::catalog::{
    prepare, HttpMethod, ParamDef, ParamType, TokenMode, ToolDescriptor,
};
use openapi_mcp_core::transport::{ApiTransport, HttpTransport};
use openapi_mcp_core::types::ApiConfig;
use openapi_mcp_core::Error;
use serde_json::{json, Value};
use std::net::SocketAddr;

/// Echoes what it received inside a success envelope. Paths containing `/fail`
/// answer with a business error and `/plain` with a non-JSON 502.
async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Response {
    let path = uri.path().to_string();
    if path.contains("/fail") {
        return Json(json!({ "code": 99991663, "msg": "Invalid access token for authorization" }))
            .into_response();
    }
    if path.contains("/plain") {
        return (StatusCode::BAD_GATEWAY, "bad gateway").into_response();
    }

    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    Json(json!({
        "code": 0,
        "msg": "success",
        "data": {
            "method": method.as_str(),
            "path": path,
            "query": uri.query().unwrap_or(""),
            "auth": auth,
            "body": body,
        }
    }))
    .into_response()
}

/// Helper: spin up the echo server on a random port.
async fn start_echo_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(echo);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn transport(addr: SocketAddr) -> HttpTransport {
    HttpTransport::new(&ApiConfig {
        domain: format!("http://{}", addr),
        tenant_access_token: Some("t-tenant".to_string()),
        user_access_token: None,
        ..ApiConfig::default()
    })
    .unwrap()
}

fn members_tool() -> ToolDescriptor {
    ToolDescriptor::new(
        "im.v1.chatMembers.get",
        HttpMethod::Get,
        "/open-apis/im/v1/chats/:chat_id/members",
        "List the members of a chat",
        "获取群成员列表",
    )
    .with_path(vec![ParamDef::new("chat_id", ParamType::String, "Chat ID", "群 ID")])
    .with_params(vec![
        ParamDef::new(
            "member_ids",
            ParamType::optional(ParamType::StringList),
            "Member IDs",
            "成员 ID",
        ),
        ParamDef::new("page_size", ParamType::Int, "Page size", "分页大小")
            .with_default(json!(20)),
    ])
}

#[tokio::test]
async fn test_get_encodes_path_and_repeats_list_query() {
    let addr = start_echo_server().await;
    let request = prepare(
        &members_tool(),
        &json!({ "path": { "chat_id": "oc a/b" }, "params": { "member_ids": ["u1", "u2"] } }),
        TokenMode::Auto,
    )
    .unwrap();

    let data = transport(addr)
        .send(&request)
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(data["method"], "GET");
    assert_eq!(data["path"], "/open-apis/im/v1/chats/oc%20a%2Fb/members");
    let query = data["query"].as_str().unwrap();
    assert!(query.contains("member_ids=u1&member_ids=u2"), "query was {}", query);
    assert!(query.contains("page_size=20"), "query was {}", query);
    assert_eq!(data["auth"], "Bearer t-tenant");
    assert_eq!(data["body"], Value::Null);
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let addr = start_echo_server().await;
    let tool = ToolDescriptor::new(
        "im.v1.message.create",
        HttpMethod::Post,
        "/open-apis/im/v1/messages",
        "Send a message",
        "发送消息",
    )
    .with_params(vec![ParamDef::new(
        "receive_id_type",
        ParamType::one_of(&["open_id", "chat_id"]),
        "Type of receive_id",
        "消息接收者 ID 类型",
    )])
    .with_data(vec![
        ParamDef::new("receive_id", ParamType::String, "Receiver", "接收者"),
        ParamDef::new("content", ParamType::String, "Content", "内容"),
    ]);

    let request = prepare(
        &tool,
        &json!({
            "params": { "receive_id_type": "chat_id" },
            "data": { "receive_id": "oc_1", "content": "{\"text\":\"hi\"}" }
        }),
        TokenMode::Auto,
    )
    .unwrap();

    let data = transport(addr)
        .send(&request)
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(data["method"], "POST");
    assert_eq!(data["query"], "receive_id_type=chat_id");
    assert_eq!(
        data["body"],
        json!({ "receive_id": "oc_1", "content": "{\"text\":\"hi\"}" })
    );
}

#[tokio::test]
async fn test_missing_token_is_auth_error() {
    let addr = start_echo_server().await;
    let request = prepare(
        &members_tool(),
        &json!({ "path": { "chat_id": "oc_1" } }),
        TokenMode::UserAccessToken,
    )
    .unwrap();

    let err = transport(addr).send(&request).await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_business_error_becomes_upstream_error() {
    let addr = start_echo_server().await;
    let request = prepare(
        &members_tool(),
        &json!({ "path": { "chat_id": "fail" } }),
        TokenMode::Auto,
    )
    .unwrap();

    let response = transport(addr).send(&request).await.unwrap();
    assert_eq!(response.status, 200);
    assert!(!response.is_success());
    match response.into_result() {
        Err(Error::Upstream { code, msg }) => {
            assert_eq!(code, 99991663);
            assert_eq!(msg, "Invalid access token for authorization");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_response_reports_status() {
    let addr = start_echo_server().await;
    let request = prepare(
        &members_tool(),
        &json!({ "path": { "chat_id": "plain" } }),
        TokenMode::Auto,
    )
    .unwrap();

    let response = transport(addr).send(&request).await.unwrap();
    assert_eq!(response.status, 502);
    assert_eq!(response.body, json!("bad gateway"));
    let err = response.into_result().unwrap_err();
    assert_eq!(err.to_string(), "upstream error 0: HTTP 502");
}
