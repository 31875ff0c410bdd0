// cloud-gate-mcp/src/server/tests.rs
// ============================================================================
// Module: MCP Server Tests
// Description: Unit tests for JSON-RPC handling, framing, and tool listings.
// Purpose: Verify protocol errors, gating, and envelope-shaped results.
// Dependencies: cloud-gate-config, cloud-gate-core, serde_json, tokio
// ============================================================================

//! ## Overview
//! Tests JSON-RPC request handling against a fake connector, the gated tool
//! listing with its rendered input schemas, and Content-Length framing.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, reason = "Tests assert outcomes.")]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use cloud_gate_config::AuditConfig;
use cloud_gate_config::AuditSinkKind;
use cloud_gate_config::CloudGateConfig;
use cloud_gate_contract::operation_catalog;
use cloud_gate_core::Dispatcher;
use cloud_gate_core::DispatcherConfig;
use cloud_gate_core::FeatureGate;
use cloud_gate_core::ModuleFlags;
use serde_json::Value;
use serde_json::json;
use tokio::io::BufReader;

use crate::audit::NoopAuditSink;
use crate::connector::CloudConnector;
use crate::connector::ConnectorCall;
use crate::connector::ConnectorError;
use crate::handlers::build_registry;
use crate::server::JsonRpcRequest;
use crate::server::McpServer;
use crate::server::McpServerError;
use crate::server::ServerState;
use crate::server::handle_request;
use crate::server::read_framed;
use crate::server::write_framed;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Connector that echoes the call back as a JSON object.
struct EchoConnector;

#[async_trait]
impl CloudConnector for EchoConnector {
    async fn call(&self, call: ConnectorCall) -> Result<Value, ConnectorError> {
        Ok(json!({
            "operation": call.operation.as_str(),
            "payload": call.payload,
        }))
    }
}

/// Builds server state over the full catalog with the given module flags.
fn state_with_flags(flags: ModuleFlags) -> ServerState {
    let registry =
        build_registry(operation_catalog(), Arc::new(EchoConnector)).expect("catalog registers");
    let dispatcher =
        Dispatcher::new(Arc::new(registry), FeatureGate::new(flags), DispatcherConfig::default());
    ServerState {
        dispatcher,
        audit: Arc::new(NoopAuditSink),
        max_request_bytes: 1024 * 1024,
    }
}

/// Builds a JSON-RPC request value for handling.
fn rpc(method: &str, params: Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: json!(7),
        method: method.to_string(),
        params: Some(params),
    }
}

// ============================================================================
// SECTION: Construction Tests
// ============================================================================

#[tokio::test]
async fn from_config_builds_over_the_full_catalog() {
    let server = McpServer::from_config(CloudGateConfig::default()).expect("defaults build");
    assert_eq!(server.state.max_request_bytes, 1024 * 1024);
}

#[tokio::test]
async fn unopenable_audit_sink_is_a_config_error() {
    let config = CloudGateConfig {
        audit: AuditConfig {
            sink: AuditSinkKind::File,
            path: Some(PathBuf::from("/nonexistent-audit-dir/cloud-gate.log")),
        },
        ..CloudGateConfig::default()
    };
    let err = McpServer::from_config(config).expect_err("sink cannot open");
    assert!(matches!(err, McpServerError::Config(_)));
}

// ============================================================================
// SECTION: Protocol Tests
// ============================================================================

#[tokio::test]
async fn wrong_version_is_rejected() {
    let state = state_with_flags(ModuleFlags::new());
    let request = JsonRpcRequest {
        jsonrpc: "1.0".to_string(),
        id: json!(1),
        method: "tools/list".to_string(),
        params: None,
    };
    let (status, response) = handle_request(&state, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.expect("protocol error").code, -32600);
}

#[tokio::test]
async fn unknown_method_is_rejected() {
    let state = state_with_flags(ModuleFlags::new());
    let (status, response) = handle_request(&state, rpc("tools/unknown", Value::Null)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.expect("protocol error").code, -32601);
}

#[tokio::test]
async fn non_object_arguments_are_rejected() {
    let state = state_with_flags(ModuleFlags::new());
    let params = json!({ "name": "list_buckets", "arguments": [1, 2] });
    let (status, response) = handle_request(&state, rpc("tools/call", params)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error.expect("protocol error").code, -32602);
}

// ============================================================================
// SECTION: Tool Listing Tests
// ============================================================================

#[tokio::test]
async fn tools_list_renders_input_schemas() {
    let state = state_with_flags(ModuleFlags::new());
    let (status, response) = handle_request(&state, rpc("tools/list", Value::Null)).await;
    assert_eq!(status, StatusCode::OK);

    let result = response.result.expect("result");
    let tools = result["tools"].as_array().expect("tool array");
    assert_eq!(tools.len(), operation_catalog().len());

    let create_bucket = tools
        .iter()
        .find(|tool| tool["name"] == "create_bucket")
        .expect("create_bucket listed");
    let schema = &create_bucket["inputSchema"];
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["bucket_name"]["type"], "string");
    assert_eq!(schema["properties"]["bucket_name"]["minLength"], 1);
    assert_eq!(schema["properties"]["storage_tier"]["enum"], json!(["Standard", "Archive"]));
    assert_eq!(schema["properties"]["storage_tier"]["default"], "Standard");
    let required = schema["required"].as_array().expect("required array");
    assert!(required.contains(&json!("bucket_name")));
    assert!(!required.contains(&json!("storage_tier")));
}

#[tokio::test]
async fn tools_list_hides_disabled_modules() {
    let mut flags = ModuleFlags::new();
    flags.set("storage", false);
    let state = state_with_flags(flags);

    let (_status, response) = handle_request(&state, rpc("tools/list", Value::Null)).await;
    let result = response.result.expect("result");
    let tools = result["tools"].as_array().expect("tool array");
    assert!(tools.iter().all(|tool| tool["name"] != "list_buckets"));
    assert!(tools.iter().any(|tool| tool["name"] == "list_clusters"));
}

// ============================================================================
// SECTION: Tool Call Tests
// ============================================================================

#[tokio::test]
async fn tools_call_answers_with_the_envelope() {
    let state = state_with_flags(ModuleFlags::new());
    let params = json!({
        "name": "list_buckets",
        "arguments": { "limit": 5 },
    });
    let (status, response) = handle_request(&state, rpc("tools/call", params)).await;
    assert_eq!(status, StatusCode::OK);

    let result = response.result.expect("result");
    let envelope = &result["content"][0]["json"];
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["data"]["operation"], "list_buckets");
    assert_eq!(envelope["data"]["payload"]["limit"], 5);
    assert_eq!(envelope["metadata"]["request_id"], "7");
}

#[tokio::test]
async fn invocation_failures_stay_in_the_envelope() {
    let state = state_with_flags(ModuleFlags::new());
    let params = json!({
        "name": "create_bucket",
        "arguments": {},
    });
    let (status, response) = handle_request(&state, rpc("tools/call", params)).await;
    assert_eq!(status, StatusCode::OK);

    let result = response.result.expect("result");
    let envelope = &result["content"][0]["json"];
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["error"]["kind"], "missing_field");
    assert_eq!(envelope["error"]["field"], "bucket_name");
}

#[tokio::test]
async fn unknown_tool_fails_inside_the_envelope() {
    let state = state_with_flags(ModuleFlags::new());
    let params = json!({ "name": "no_such_tool", "arguments": {} });
    let (status, response) = handle_request(&state, rpc("tools/call", params)).await;
    assert_eq!(status, StatusCode::OK);

    let result = response.result.expect("result");
    let envelope = &result["content"][0]["json"];
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["error"]["kind"], "not_found");
}

// ============================================================================
// SECTION: Framing Tests
// ============================================================================

#[tokio::test]
async fn framing_round_trips() {
    let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
    let mut framed = Vec::new();
    write_framed(&mut framed, payload).await.expect("write");

    let mut reader = BufReader::new(framed.as_slice());
    let decoded = read_framed(&mut reader, 4096).await.expect("read");
    assert_eq!(decoded, payload);
}

#[tokio::test]
async fn framing_rejects_oversized_payloads() {
    let payload = vec![b'x'; 64];
    let mut framed = Vec::new();
    write_framed(&mut framed, &payload).await.expect("write");

    let mut reader = BufReader::new(framed.as_slice());
    let err = read_framed(&mut reader, 16).await.expect_err("too large");
    assert!(err.to_string().contains("payload too large"));
}

#[tokio::test]
async fn framing_requires_a_content_length_header() {
    let mut reader = BufReader::new("X-Other: 1\r\n\r\n".as_bytes());
    let err = read_framed(&mut reader, 4096).await.expect_err("missing header");
    assert!(err.to_string().contains("missing content length"));
}
