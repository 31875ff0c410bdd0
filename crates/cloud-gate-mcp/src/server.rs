// cloud-gate-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: JSON-RPC transports over the dispatch gateway.
// Purpose: Serve tools/list and tools/call on stdio and HTTP.
// Dependencies: cloud-gate-core, axum, tokio
// ============================================================================

//! ## Overview
//! The server wires the contract catalog, connector, feature gate, and
//! dispatcher together and exposes them as MCP tools. Inputs are untrusted:
//! bodies are size-limited and malformed JSON-RPC gets protocol errors.
//! Everything past the protocol layer answers through the uniform envelope,
//! including failures, so a tools/call response always has the same shape.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use cloud_gate_config::CloudGateConfig;
use cloud_gate_config::TransportKind;
use cloud_gate_contract::operation_catalog;
use cloud_gate_core::Constraint;
use cloud_gate_core::Dispatcher;
use cloud_gate_core::DispatcherConfig;
use cloud_gate_core::Envelope;
use cloud_gate_core::FeatureGate;
use cloud_gate_core::FieldDescriptor;
use cloud_gate_core::FieldType;
use cloud_gate_core::InvocationRequest;
use cloud_gate_core::OperationName;
use cloud_gate_core::ParameterSchema;
use cloud_gate_core::RequestId;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;

use crate::audit::AuditSink;
use crate::audit::InvocationAuditEvent;
use crate::audit::build_audit_sink;
use crate::connector::HttpConnector;
use crate::handlers::build_registry;

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// MCP server over the dispatch gateway.
pub struct McpServer {
    /// Loaded configuration.
    config: CloudGateConfig,
    /// Shared request-handling state.
    state: Arc<ServerState>,
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl McpServer {
    /// Builds the server from configuration: connector, registry, gate,
    /// dispatcher, and audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError::Init`] when registry assembly fails and
    /// [`McpServerError::Config`] when the configured audit sink cannot be
    /// opened.
    pub fn from_config(config: CloudGateConfig) -> Result<Self, McpServerError> {
        let connector = Arc::new(HttpConnector::new(config.connector.clone()));
        let registry = build_registry(operation_catalog(), connector)
            .map_err(|err| McpServerError::Init(err.to_string()))?;
        let gate = FeatureGate::new(config.modules.clone());
        let dispatcher_config = DispatcherConfig {
            invoke_timeout: Duration::from_millis(config.limits.invoke_timeout_ms),
            max_payload_bytes: config.limits.max_payload_bytes,
        };
        let dispatcher = Dispatcher::new(Arc::new(registry), gate, dispatcher_config);
        let audit = build_audit_sink(&config.audit)
            .map_err(|err| McpServerError::Config(err.to_string()))?;
        let state = Arc::new(ServerState {
            dispatcher,
            audit,
            max_request_bytes: config.limits.max_request_bytes,
        });
        Ok(Self {
            config,
            state,
        })
    }

    /// Serves requests using the configured transport.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the transport fails.
    pub async fn serve(self) -> Result<(), McpServerError> {
        match self.config.server.transport {
            TransportKind::Stdio => serve_stdio(&self.state).await,
            TransportKind::Http => serve_http(self.config.server.bind_addr, self.state).await,
        }
    }
}

/// Shared state for request handlers.
struct ServerState {
    /// Dispatch pipeline.
    dispatcher: Dispatcher,
    /// Audit sink recording one event per invocation.
    audit: Arc<dyn AuditSink>,
    /// Maximum allowed request body size.
    max_request_bytes: usize,
}

// ============================================================================
// SECTION: Stdio Transport
// ============================================================================

/// Serves JSON-RPC requests over stdin/stdout with Content-Length framing.
async fn serve_stdio(state: &ServerState) -> Result<(), McpServerError> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();
    loop {
        let bytes = read_framed(&mut reader, state.max_request_bytes).await?;
        let request: JsonRpcRequest = serde_json::from_slice(&bytes)
            .map_err(|_| McpServerError::Transport("invalid json-rpc request".to_string()))?;
        let (_status, response) = handle_request(state, request).await;
        let payload = serde_json::to_vec(&response)
            .map_err(|_| McpServerError::Transport("json-rpc serialization failed".to_string()))?;
        write_framed(&mut writer, &payload).await?;
    }
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Serves JSON-RPC requests over HTTP POST.
async fn serve_http(addr: SocketAddr, state: Arc<ServerState>) -> Result<(), McpServerError> {
    let app = Router::new().route("/rpc", post(handle_http)).with_state(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|_| McpServerError::Transport("http bind failed".to_string()))?;
    axum::serve(listener, app)
        .await
        .map_err(|_| McpServerError::Transport("http server failed".to_string()))
}

/// Handles one HTTP JSON-RPC request.
async fn handle_http(State(state): State<Arc<ServerState>>, bytes: Bytes) -> impl IntoResponse {
    if bytes.len() > state.max_request_bytes {
        let response = protocol_error(Value::Null, -32070, "request body too large");
        return (StatusCode::PAYLOAD_TOO_LARGE, axum::Json(response));
    }
    let request: JsonRpcRequest = match serde_json::from_slice(bytes.as_ref()) {
        Ok(request) => request,
        Err(_) => {
            let response = protocol_error(Value::Null, -32700, "parse error");
            return (StatusCode::BAD_REQUEST, axum::Json(response));
        }
    };
    let (status, response) = handle_request(&state, request).await;
    (status, axum::Json(response))
}

// ============================================================================
// SECTION: JSON-RPC Handling
// ============================================================================

/// Incoming JSON-RPC request payload.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC protocol version.
    jsonrpc: String,
    /// Request identifier.
    id: Value,
    /// Method name.
    method: String,
    /// Optional parameters payload.
    params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    jsonrpc: &'static str,
    /// Request identifier.
    id: Value,
    /// Successful result payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    /// Error payload when the request fails at the protocol layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error payload.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    /// Error code.
    code: i64,
    /// Human-readable error message.
    message: String,
}

/// Tool call parameters for JSON-RPC requests.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    /// Tool name.
    name: String,
    /// Raw JSON arguments.
    #[serde(default)]
    arguments: Value,
}

/// One advertised tool in a tools/list response.
#[derive(Debug, Serialize)]
struct ToolDefinition {
    /// Tool name.
    name: String,
    /// Human-readable description.
    description: String,
    /// JSON schema for the tool's input object.
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

/// Dispatches one JSON-RPC request.
///
/// Protocol-level failures (bad version, unknown method, malformed params)
/// return JSON-RPC errors. Everything else, including every invocation
/// failure, returns a result carrying the uniform envelope.
async fn handle_request(
    state: &ServerState,
    request: JsonRpcRequest,
) -> (StatusCode, JsonRpcResponse) {
    if request.jsonrpc != "2.0" {
        let response = protocol_error(request.id, -32600, "invalid json-rpc version");
        return (StatusCode::BAD_REQUEST, response);
    }
    match request.method.as_str() {
        "tools/list" => {
            let tools = list_tools(state);
            (
                StatusCode::OK,
                JsonRpcResponse {
                    jsonrpc: "2.0",
                    id: request.id,
                    result: Some(json!({ "tools": tools })),
                    error: None,
                },
            )
        }
        "tools/call" => {
            let id = request.id;
            let params = request.params.unwrap_or(Value::Null);
            let Ok(call) = serde_json::from_value::<ToolCallParams>(params) else {
                let response = protocol_error(id, -32602, "invalid tool params");
                return (StatusCode::BAD_REQUEST, response);
            };
            let raw_parameters = match call.arguments {
                Value::Object(map) => map,
                Value::Null => Map::new(),
                _ => {
                    let response = protocol_error(id, -32602, "arguments must be an object");
                    return (StatusCode::BAD_REQUEST, response);
                }
            };
            let envelope = call_tool(state, &call.name, raw_parameters, &id).await;
            let Ok(envelope_json) = serde_json::to_value(envelope) else {
                let response = protocol_error(id, -32603, "serialization failed");
                return (StatusCode::INTERNAL_SERVER_ERROR, response);
            };
            (
                StatusCode::OK,
                JsonRpcResponse {
                    jsonrpc: "2.0",
                    id,
                    result: Some(json!({
                        "content": [ { "type": "json", "json": envelope_json } ]
                    })),
                    error: None,
                },
            )
        }
        _ => {
            let response = protocol_error(request.id, -32601, "method not found");
            (StatusCode::BAD_REQUEST, response)
        }
    }
}

/// Lists tools whose module passes the feature gate. Listing and dispatch
/// share one gate predicate, so a hidden tool is also uninvokable.
fn list_tools(state: &ServerState) -> Vec<ToolDefinition> {
    let registry = state.dispatcher.registry();
    state
        .dispatcher
        .gate()
        .filter_callable(registry.iter())
        .map(|descriptor| ToolDefinition {
            name: descriptor.name.as_str().to_string(),
            description: descriptor.description.clone(),
            input_schema: input_schema_json(&descriptor.schema),
        })
        .collect()
}

/// Dispatches one tool call and records its audit event.
async fn call_tool(
    state: &ServerState,
    name: &str,
    raw_parameters: Map<String, Value>,
    id: &Value,
) -> Envelope {
    let operation = OperationName::new(name);
    let request_id = match id {
        Value::String(text) => RequestId::new(text.clone()),
        other => RequestId::new(other.to_string()),
    };
    let request = InvocationRequest {
        operation: operation.clone(),
        raw_parameters,
        request_id: Some(request_id),
    };
    let outcome = state.dispatcher.dispatch(request).await;
    state.audit.record(&InvocationAuditEvent::from_outcome(&operation, &outcome));
    outcome.result.into_envelope()
}

/// Builds a protocol-level JSON-RPC error response.
fn protocol_error(id: Value, code: i64, message: &str) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_string(),
        }),
    }
}

// ============================================================================
// SECTION: Schema Rendering
// ============================================================================

/// Renders a parameter schema as a JSON schema object for tool listings.
fn input_schema_json(schema: &ParameterSchema) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in &schema.fields {
        properties.insert(field.name.clone(), field_json(field));
        if field.required {
            required.push(Value::String(field.name.clone()));
        }
    }
    let mut object = Map::new();
    object.insert("type".to_string(), json!("object"));
    object.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        object.insert("required".to_string(), Value::Array(required));
    }
    Value::Object(object)
}

/// Renders one field descriptor.
fn field_json(field: &FieldDescriptor) -> Value {
    let mut rendered = field_type_json(&field.field_type);
    if let Value::Object(map) = &mut rendered {
        if !field.description.is_empty() {
            map.insert("description".to_string(), json!(field.description));
        }
        if let Some(default) = &field.default {
            map.insert("default".to_string(), default.clone());
        }
        for constraint in &field.constraints {
            let (key, value) = constraint_json(constraint);
            map.insert(key.to_string(), value);
        }
    }
    rendered
}

/// Renders a field type.
fn field_type_json(field_type: &FieldType) -> Value {
    match field_type {
        FieldType::String => json!({ "type": "string" }),
        FieldType::Integer {
            ..
        } => json!({ "type": "integer" }),
        FieldType::Boolean => json!({ "type": "boolean" }),
        FieldType::Enum {
            allowed,
        } => json!({ "type": "string", "enum": allowed }),
        FieldType::Object {
            schema,
        } => input_schema_json(schema),
        FieldType::Sequence {
            items,
        } => json!({ "type": "array", "items": field_type_json(items) }),
    }
}

/// Renders one constraint as a JSON schema keyword.
fn constraint_json(constraint: &Constraint) -> (&'static str, Value) {
    match constraint {
        Constraint::MinLength(min) => ("minLength", json!(min)),
        Constraint::MaxLength(max) => ("maxLength", json!(max)),
        Constraint::Pattern(pattern) => ("pattern", json!(pattern)),
        Constraint::Min(min) => ("minimum", json!(min)),
        Constraint::Max(max) => ("maximum", json!(max)),
        Constraint::MinItems(min) => ("minItems", json!(min)),
        Constraint::MaxItems(max) => ("maxItems", json!(max)),
    }
}

// ============================================================================
// SECTION: Framing Helpers
// ============================================================================

/// Reads a framed payload using MCP Content-Length headers.
async fn read_framed<R>(
    reader: &mut BufReader<R>,
    max_body_bytes: usize,
) -> Result<Vec<u8>, McpServerError>
where
    R: AsyncRead + Unpin,
{
    let mut content_length: Option<usize> = None;
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .await
            .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
        if bytes == 0 {
            return Err(McpServerError::Transport("stdio closed".to_string()));
        }
        if line.trim().is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("Content-Length:") {
            let parsed = value
                .trim()
                .parse::<usize>()
                .map_err(|_| McpServerError::Transport("invalid content length".to_string()))?;
            content_length = Some(parsed);
        }
    }
    let len = content_length
        .ok_or_else(|| McpServerError::Transport("missing content length".to_string()))?;
    if len > max_body_bytes {
        return Err(McpServerError::Transport("payload too large".to_string()));
    }
    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .await
        .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
    Ok(buf)
}

/// Writes a framed payload using MCP Content-Length headers.
async fn write_framed<W>(writer: &mut W, payload: &[u8]) -> Result<(), McpServerError>
where
    W: AsyncWrite + Unpin,
{
    let header = format!("Content-Length: {}\r\n\r\n", payload.len());
    writer
        .write_all(header.as_bytes())
        .await
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))?;
    writer
        .write_all(payload)
        .await
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))?;
    writer
        .flush()
        .await
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// MCP server errors.
#[derive(Debug, thiserror::Error)]
pub enum McpServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
