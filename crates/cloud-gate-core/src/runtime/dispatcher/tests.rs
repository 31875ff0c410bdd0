// cloud-gate-core/src/runtime/dispatcher/tests.rs
// ============================================================================
// Module: Dispatcher Tests
// Description: Unit tests for the staged dispatch pipeline.
// Purpose: Verify stage attribution, gating, timeouts, and normalization.
// Dependencies: async-trait, serde_json, tokio
// ============================================================================

//! ## Overview
//! Drives full dispatches through counting and misbehaving fake handlers to
//! verify stage attribution, that gated and invalid requests never reach a
//! handler, and that timeouts surface as retryable failures.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Tests use unwrap/expect/panic for brevity."
)]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;

use super::DispatchStage;
use super::Dispatcher;
use super::DispatcherConfig;
use crate::core::envelope::InvocationRequest;
use crate::core::failure::FailureKind;
use crate::core::identifiers::ModuleTag;
use crate::core::identifiers::OperationName;
use crate::core::params::TypedParameters;
use crate::core::schema::Constraint;
use crate::core::schema::FieldDescriptor;
use crate::core::schema::FieldType;
use crate::core::schema::ParameterSchema;
use crate::interfaces::HandlerError;
use crate::interfaces::OperationHandler;
use crate::runtime::gate::FeatureGate;
use crate::runtime::gate::ModuleFlags;
use crate::runtime::registry::OperationDescriptor;
use crate::runtime::registry::OperationRegistry;

/// Handler that counts invocations and returns a fixed payload.
struct CountingHandler {
    /// Number of completed invoke calls.
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl OperationHandler for CountingHandler {
    async fn invoke(&self, _params: TypedParameters) -> Result<Value, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({"ok": true}))
    }
}

/// Handler that sleeps past any test timeout.
struct SlowHandler;

#[async_trait]
impl OperationHandler for SlowHandler {
    async fn invoke(&self, _params: TypedParameters) -> Result<Value, HandlerError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(json!(null))
    }
}

/// Handler that fails with a configurable error.
struct FailingHandler {
    /// Error returned on every invocation.
    error: HandlerError,
}

#[async_trait]
impl OperationHandler for FailingHandler {
    async fn invoke(&self, _params: TypedParameters) -> Result<Value, HandlerError> {
        Err(self.error.clone())
    }
}

fn bucket_schema() -> ParameterSchema {
    ParameterSchema::new(vec![
        FieldDescriptor::required("bucket_name", FieldType::String)
            .with_constraint(Constraint::MinLength(1)),
    ])
}

fn dispatcher_with(
    handler: Arc<dyn OperationHandler>,
    schema: ParameterSchema,
    flags: ModuleFlags,
    timeout: Duration,
) -> Dispatcher {
    let mut registry = OperationRegistry::new();
    registry
        .register(OperationDescriptor {
            name: OperationName::new("create_bucket"),
            module: ModuleTag::new("storage"),
            description: "create a bucket".to_string(),
            schema,
            handler,
        })
        .unwrap();
    let config = DispatcherConfig {
        invoke_timeout: timeout,
        ..DispatcherConfig::default()
    };
    Dispatcher::new(Arc::new(registry), FeatureGate::new(flags), config)
}

fn request(params: &[(&str, Value)]) -> InvocationRequest {
    let mut request = InvocationRequest::new("create_bucket");
    for (name, value) in params {
        request = request.with_parameter(*name, value.clone());
    }
    request
}

#[tokio::test]
async fn unknown_operation_fails_at_received() {
    let calls = Arc::new(AtomicUsize::new(0));
    let dispatcher = dispatcher_with(
        Arc::new(CountingHandler {
            calls: Arc::clone(&calls),
        }),
        bucket_schema(),
        ModuleFlags::new(),
        Duration::from_secs(5),
    );
    let outcome = dispatcher.dispatch(InvocationRequest::new("no_such_op")).await;
    assert_eq!(outcome.stage, DispatchStage::Received);
    assert!(!outcome.handler_invoked);
    let failure = outcome.result.failure().expect("failure");
    assert_eq!(failure.kind, FailureKind::NotFound);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn disabled_module_fails_at_gated_without_invoking() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut flags = ModuleFlags::new();
    flags.set("storage", false);
    let dispatcher = dispatcher_with(
        Arc::new(CountingHandler {
            calls: Arc::clone(&calls),
        }),
        bucket_schema(),
        flags,
        Duration::from_secs(5),
    );
    let outcome = dispatcher.dispatch(request(&[("bucket_name", json!("logs"))])).await;
    assert_eq!(outcome.stage, DispatchStage::Gated);
    assert!(!outcome.handler_invoked);
    let failure = outcome.result.failure().expect("failure");
    assert_eq!(
        failure.kind,
        FailureKind::ModuleDisabled {
            module: ModuleTag::new("storage")
        }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn gating_runs_before_validation() {
    // Invalid parameters against a disabled module report the gate failure,
    // not the validation failure.
    let mut flags = ModuleFlags::new();
    flags.set("storage", false);
    let dispatcher = dispatcher_with(
        Arc::new(CountingHandler {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        bucket_schema(),
        flags,
        Duration::from_secs(5),
    );
    let outcome = dispatcher.dispatch(request(&[])).await;
    assert_eq!(outcome.stage, DispatchStage::Gated);
    assert!(matches!(
        outcome.result.failure().expect("failure").kind,
        FailureKind::ModuleDisabled { .. }
    ));
}

#[tokio::test]
async fn validation_failure_never_reaches_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let dispatcher = dispatcher_with(
        Arc::new(CountingHandler {
            calls: Arc::clone(&calls),
        }),
        bucket_schema(),
        ModuleFlags::new(),
        Duration::from_secs(5),
    );
    let outcome = dispatcher.dispatch(request(&[("bucket_name", json!(""))])).await;
    assert_eq!(outcome.stage, DispatchStage::Validated);
    assert!(!outcome.handler_invoked);
    assert!(matches!(
        outcome.result.failure().expect("failure").kind,
        FailureKind::Constraint { .. }
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn successful_dispatch_completes_with_metadata() {
    let calls = Arc::new(AtomicUsize::new(0));
    let dispatcher = dispatcher_with(
        Arc::new(CountingHandler {
            calls: Arc::clone(&calls),
        }),
        bucket_schema(),
        ModuleFlags::new(),
        Duration::from_secs(5),
    );
    let outcome = dispatcher
        .dispatch(request(&[("bucket_name", json!("logs"))]).with_request_id("req-7"))
        .await;
    assert_eq!(outcome.stage, DispatchStage::Completed);
    assert!(outcome.handler_invoked);
    assert!(outcome.result.is_success());
    let metadata = outcome.result.metadata();
    assert_eq!(metadata.request_id.as_ref().map(|id| id.as_str()), Some("req-7"));
    assert!(metadata.timestamp_ms > 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn timeout_surfaces_as_retryable_failure() {
    let dispatcher = dispatcher_with(
        Arc::new(SlowHandler),
        bucket_schema(),
        ModuleFlags::new(),
        Duration::from_millis(20),
    );
    let outcome = dispatcher.dispatch(request(&[("bucket_name", json!("logs"))])).await;
    assert_eq!(outcome.stage, DispatchStage::Invoking);
    assert!(outcome.handler_invoked);
    let failure = outcome.result.failure().expect("failure");
    assert_eq!(failure.kind, FailureKind::Timeout);
    assert!(failure.retryable);
}

#[tokio::test]
async fn handler_error_keeps_its_retryability() {
    let dispatcher = dispatcher_with(
        Arc::new(FailingHandler {
            error: HandlerError::transient("connection reset"),
        }),
        bucket_schema(),
        ModuleFlags::new(),
        Duration::from_secs(5),
    );
    let outcome = dispatcher.dispatch(request(&[("bucket_name", json!("logs"))])).await;
    assert_eq!(outcome.stage, DispatchStage::Invoking);
    let failure = outcome.result.failure().expect("failure");
    assert_eq!(failure.kind, FailureKind::Handler);
    assert!(failure.retryable);
}

#[tokio::test]
async fn not_implemented_handler_maps_to_not_implemented_kind() {
    let dispatcher = dispatcher_with(
        Arc::new(FailingHandler {
            error: HandlerError::not_implemented("catalog module pending"),
        }),
        bucket_schema(),
        ModuleFlags::new(),
        Duration::from_secs(5),
    );
    let outcome = dispatcher.dispatch(request(&[("bucket_name", json!("logs"))])).await;
    let failure = outcome.result.failure().expect("failure");
    assert_eq!(failure.kind, FailureKind::NotImplemented);
    assert!(!failure.retryable);
}

#[tokio::test]
async fn handler_error_messages_are_sanitized() {
    let dispatcher = dispatcher_with(
        Arc::new(FailingHandler {
            error: HandlerError::permanent("denied for ocid1.bucket.oc1..abcd"),
        }),
        bucket_schema(),
        ModuleFlags::new(),
        Duration::from_secs(5),
    );
    let outcome = dispatcher.dispatch(request(&[("bucket_name", json!("logs"))])).await;
    let failure = outcome.result.failure().expect("failure");
    assert!(!failure.message.contains("ocid1."));
    assert!(failure.message.contains("[redacted:resource]"));
}
