//! JSON-RPC handling over the stdio and HTTP transports.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::MockServer;

use common::{mount_attention, setup_test_context};
use reference_mcp::server::McpServer;
use reference_mcp::server::stdio::serve_lines;
use reference_mcp::server::transport::{SESSION_HEADER, create_router};
use reference_mcp::tools::register_all_tools;

async fn run_lines(input: &str, mock_server: &MockServer) -> Vec<Value> {
    let ctx = setup_test_context(mock_server);
    let tools = register_all_tools();
    let mut output = Vec::new();

    serve_lines(input.as_bytes(), &mut output, &tools, &ctx).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

async fn post_mcp(app: axum::Router, body: String, session: Option<&str>) -> (StatusCode, Option<String>, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json");
    if let Some(id) = session {
        request = request.header(SESSION_HEADER, id);
    }

    let response = app.oneshot(request.body(Body::from(body)).unwrap()).await.unwrap();
    let status = response.status();
    let session_id = response
        .headers()
        .get(SESSION_HEADER)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };

    (status, session_id, value)
}

// =============================================================================
// Stdio
// =============================================================================

#[tokio::test]
async fn test_stdio_handshake_and_tools_list() {
    let mock_server = MockServer::start().await;
    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2025-03-26"}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        json!({"jsonrpc": "2.0", "id": 3, "method": "ping"}),
    ]
    .iter()
    .map(Value::to_string)
    .collect::<Vec<_>>()
    .join("\n");

    let responses = run_lines(&input, &mock_server).await;

    // The notification gets no response
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "reference-mcp");

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    let names: Vec<_> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["search_reference", "search", "fetch"]);
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));

    assert_eq!(responses[2]["id"], 3);
    assert_eq!(responses[2]["result"], json!({}));
}

#[tokio::test]
async fn test_stdio_errors() {
    let mock_server = MockServer::start().await;
    let input = [
        "{not json".to_string(),
        String::new(),
        json!({"jsonrpc": "2.0", "id": 7, "method": "resources/list"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 8, "method": "tools/call", "params": {"name": "nope"}}).to_string(),
        json!({"jsonrpc": "2.0", "id": 9, "method": "tools/call",
               "params": {"name": "search", "arguments": {"query": ""}}})
        .to_string(),
    ]
    .join("\n");

    let responses = run_lines(&input, &mock_server).await;

    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[1]["error"]["code"], -32601);
    assert_eq!(responses[1]["id"], 7);
    assert_eq!(responses[2]["error"]["code"], -32602);
    assert_eq!(responses[3]["error"]["code"], -32000);
    assert!(responses[3]["error"]["message"].as_str().unwrap().contains("query"));
}

#[tokio::test]
async fn test_stdio_tool_call() {
    let mock_server = MockServer::start().await;
    mount_attention(&mock_server).await;

    let input = json!({
        "jsonrpc": "2.0",
        "id": "call-1",
        "method": "tools/call",
        "params": {"name": "search", "arguments": {"query": "attention", "topK": 2}}
    })
    .to_string();

    let responses = run_lines(&input, &mock_server).await;

    assert_eq!(responses[0]["id"], "call-1");
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    let hits: Vec<Value> = serde_json::from_str(text).unwrap();
    assert_eq!(hits[0]["id"], "10.48550/arxiv.1706.03762");
}

// =============================================================================
// HTTP
// =============================================================================

#[tokio::test]
async fn test_http_health_endpoints() {
    let mock_server = MockServer::start().await;
    let app = create_router(register_all_tools(), setup_test_context(&mock_server));

    for uri in ["/", "/health"] {
        let response =
            app.clone().oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response =
        app.oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap()).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["tools"], 3);
    assert_eq!(body["providers"], json!(["dblp", "semantic_scholar", "arxiv", "openalex"]));
}

#[tokio::test]
async fn test_http_session_lifecycle() {
    let mock_server = MockServer::start().await;
    let app = create_router(register_all_tools(), setup_test_context(&mock_server));

    let init = json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}).to_string();
    let (status, session, body) = post_mcp(app.clone(), init, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["protocolVersion"], "2024-11-05");
    let session = session.expect("initialize issues a session id");
    assert!(uuid::Uuid::parse_str(&session).is_ok());

    let list = json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}).to_string();
    let (_, echoed, body) = post_mcp(app.clone(), list, Some(&session)).await;
    assert_eq!(echoed.as_deref(), Some(session.as_str()));
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 3);

    let note = json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string();
    let (status, _, body) = post_mcp(app, note, Some(&session)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_http_parse_error() {
    let mock_server = MockServer::start().await;
    let app = create_router(register_all_tools(), setup_test_context(&mock_server));

    let (status, _, body) = post_mcp(app, "{oops".to_string(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32700);
}

#[tokio::test]
async fn test_server_tool_registry() {
    let mock_server = MockServer::start().await;
    let server = McpServer::new(setup_test_context(&mock_server));

    assert!(server.get_tool("fetch").is_some());
    assert!(server.get_tool("exhaustive_search").is_none());
    assert_eq!(server.list_tools().len(), 3);
    assert_eq!(server.context().providers.len(), 4);
}
