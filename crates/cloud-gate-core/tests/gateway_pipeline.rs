// cloud-gate-core/tests/gateway_pipeline.rs
// ============================================================================
// Module: Gateway Pipeline Tests
// Description: End-to-end dispatch through the full pipeline to an envelope.
// Purpose: Ensure every outcome leaves as a well-formed uniform envelope.
// Dependencies: async-trait, cloud-gate-core, serde_json, tokio
// ============================================================================
//! ## Overview
//! Builds a small registry with real schemas, dispatches representative
//! requests, and asserts on the serialized envelope: uniform shape, stable
//! failure tags, echoed request identifiers, and metadata presence.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cloud_gate_core::Constraint;
use cloud_gate_core::Dispatcher;
use cloud_gate_core::DispatcherConfig;
use cloud_gate_core::Envelope;
use cloud_gate_core::FeatureGate;
use cloud_gate_core::FieldDescriptor;
use cloud_gate_core::FieldType;
use cloud_gate_core::HandlerError;
use cloud_gate_core::InvocationRequest;
use cloud_gate_core::ModuleFlags;
use cloud_gate_core::ModuleTag;
use cloud_gate_core::OperationDescriptor;
use cloud_gate_core::OperationHandler;
use cloud_gate_core::OperationName;
use cloud_gate_core::OperationRegistry;
use cloud_gate_core::ParameterSchema;
use cloud_gate_core::TypedParameters;
use serde_json::Value;
use serde_json::json;

/// Handler echoing its validated parameters back as the payload.
struct EchoHandler;

#[async_trait]
impl OperationHandler for EchoHandler {
    async fn invoke(&self, params: TypedParameters) -> Result<Value, HandlerError> {
        Ok(params.into_value())
    }
}

/// Handler standing in for an unbuilt module.
struct PendingHandler;

#[async_trait]
impl OperationHandler for PendingHandler {
    async fn invoke(&self, _params: TypedParameters) -> Result<Value, HandlerError> {
        Err(HandlerError::not_implemented("notebook sessions are not available yet"))
    }
}

fn build_dispatcher(flags: ModuleFlags) -> Dispatcher {
    let mut registry = OperationRegistry::new();
    registry
        .register(OperationDescriptor {
            name: OperationName::new("create_bucket"),
            module: ModuleTag::new("storage"),
            description: "Create an object storage bucket".to_string(),
            schema: ParameterSchema::new(vec![
                FieldDescriptor::required("bucket_name", FieldType::String)
                    .with_constraint(Constraint::MinLength(1))
                    .with_constraint(Constraint::MaxLength(256)),
                FieldDescriptor::optional(
                    "storage_tier",
                    FieldType::Enum {
                        allowed: vec!["Standard".to_string(), "Archive".to_string()],
                    },
                )
                .with_default(json!("Standard")),
            ]),
            handler: Arc::new(EchoHandler),
        })
        .expect("register create_bucket");
    registry
        .register(OperationDescriptor {
            name: OperationName::new("list_notebook_sessions"),
            module: ModuleTag::new("notebooks"),
            description: "List notebook sessions".to_string(),
            schema: ParameterSchema::empty(),
            handler: Arc::new(PendingHandler),
        })
        .expect("register list_notebook_sessions");
    let config = DispatcherConfig {
        invoke_timeout: Duration::from_secs(5),
        ..DispatcherConfig::default()
    };
    Dispatcher::new(Arc::new(registry), FeatureGate::new(flags), config)
}

fn envelope_json(envelope: Envelope) -> Value {
    serde_json::to_value(envelope).expect("serialize envelope")
}

/// Verifies a successful dispatch produces the uniform success envelope.
#[tokio::test]
async fn success_envelope_has_uniform_shape() {
    let dispatcher = build_dispatcher(ModuleFlags::new());
    let request = InvocationRequest::new("create_bucket")
        .with_parameter("bucket_name", json!("logs"))
        .with_request_id("req-42");
    let outcome = dispatcher.dispatch(request).await;
    let json = envelope_json(outcome.result.into_envelope());

    assert_eq!(json["success"], json!(true));
    assert_eq!(json["data"]["bucket_name"], json!("logs"));
    assert_eq!(json["data"]["storage_tier"], json!("Standard"));
    assert!(json.get("error").is_none());
    assert_eq!(json["metadata"]["request_id"], json!("req-42"));
    assert_eq!(json["metadata"]["truncated"], json!(false));
    assert!(json["metadata"]["timestamp_ms"].as_u64().expect("timestamp") > 0);
}

/// Verifies a validation failure produces the uniform failure envelope.
#[tokio::test]
async fn failure_envelope_has_uniform_shape() {
    let dispatcher = build_dispatcher(ModuleFlags::new());
    let request = InvocationRequest::new("create_bucket");
    let outcome = dispatcher.dispatch(request).await;
    let json = envelope_json(outcome.result.into_envelope());

    assert_eq!(json["success"], json!(false));
    assert!(json.get("data").is_none());
    assert_eq!(json["error"]["kind"], json!("missing_field"));
    assert_eq!(json["error"]["field"], json!("bucket_name"));
    assert_eq!(json["error"]["retryable"], json!(false));
    assert!(json["error"]["message"].as_str().expect("message").contains("bucket_name"));
}

/// Verifies gated modules refuse invocations with a module_disabled failure.
#[tokio::test]
async fn disabled_module_envelope_names_the_module() {
    let mut flags = ModuleFlags::new();
    flags.set("storage", false);
    let dispatcher = build_dispatcher(flags);
    let request =
        InvocationRequest::new("create_bucket").with_parameter("bucket_name", json!("logs"));
    let outcome = dispatcher.dispatch(request).await;
    let json = envelope_json(outcome.result.into_envelope());

    assert_eq!(json["success"], json!(false));
    assert_eq!(json["error"]["kind"], json!("module_disabled"));
    assert_eq!(json["error"]["module"], json!("storage"));
}

/// Verifies placeholder operations surface as not_implemented, not a success.
#[tokio::test]
async fn placeholder_operation_reports_not_implemented() {
    let dispatcher = build_dispatcher(ModuleFlags::new());
    let outcome = dispatcher.dispatch(InvocationRequest::new("list_notebook_sessions")).await;
    let json = envelope_json(outcome.result.into_envelope());

    assert_eq!(json["success"], json!(false));
    assert_eq!(json["error"]["kind"], json!("not_implemented"));
    assert_eq!(json["error"]["retryable"], json!(false));
}

/// Verifies envelopes round-trip through serialization unchanged.
#[tokio::test]
async fn envelope_roundtrips_through_serde() {
    let dispatcher = build_dispatcher(ModuleFlags::new());
    let request = InvocationRequest::new("create_bucket")
        .with_parameter("bucket_name", json!("logs"))
        .with_parameter("storage_tier", json!("Archive"));
    let outcome = dispatcher.dispatch(request).await;
    let envelope = outcome.result.into_envelope();
    let encoded = serde_json::to_string(&envelope).expect("serialize");
    let decoded: Envelope = serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(decoded, envelope);
}
