// cloud-gate-core/src/runtime/gate/tests.rs
// ============================================================================
// Module: Feature Gate Tests
// Description: Unit tests for module flag resolution and filtering.
// Purpose: Verify default-enabled semantics and callable filtering.
// Dependencies: async-trait, serde_json
// ============================================================================

//! ## Overview
//! Tests that absent flags default to enabled, explicit flags are honored,
//! and listing and dispatch share one predicate via `filter_callable`.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Tests use unwrap/expect/panic for brevity."
)]

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;

use super::FeatureGate;
use super::ModuleFlags;
use crate::core::identifiers::ModuleTag;
use crate::core::identifiers::OperationName;
use crate::core::params::TypedParameters;
use crate::core::schema::ParameterSchema;
use crate::interfaces::HandlerError;
use crate::interfaces::OperationHandler;
use crate::runtime::registry::OperationDescriptor;
use crate::runtime::registry::OperationRegistry;

/// Handler returning a fixed payload.
struct FixedHandler;

#[async_trait]
impl OperationHandler for FixedHandler {
    async fn invoke(&self, _params: TypedParameters) -> Result<Value, HandlerError> {
        Ok(json!(null))
    }
}

fn descriptor(name: &str, module: &str) -> OperationDescriptor {
    OperationDescriptor {
        name: OperationName::new(name),
        module: ModuleTag::new(module),
        description: String::new(),
        schema: ParameterSchema::empty(),
        handler: Arc::new(FixedHandler),
    }
}

#[test]
fn absent_flag_defaults_to_enabled() {
    let gate = FeatureGate::new(ModuleFlags::new());
    assert!(gate.is_enabled(&ModuleTag::new("storage")));
    assert!(gate.is_enabled(&ModuleTag::new("never-configured")));
}

#[test]
fn explicit_flags_are_honored() {
    let mut flags = ModuleFlags::new();
    flags.set("compute", false);
    flags.set("storage", true);
    let gate = FeatureGate::new(flags);
    assert!(!gate.is_enabled(&ModuleTag::new("compute")));
    assert!(gate.is_enabled(&ModuleTag::new("storage")));
}

#[test]
fn filter_callable_hides_disabled_modules() {
    let mut registry = OperationRegistry::new();
    registry.register(descriptor("list_buckets", "storage")).unwrap();
    registry.register(descriptor("list_instances", "compute")).unwrap();
    registry.register(descriptor("start_instance", "instance")).unwrap();

    let mut flags = ModuleFlags::new();
    flags.set("compute", false);
    let gate = FeatureGate::new(flags);

    let visible: Vec<&str> =
        gate.filter_callable(registry.iter()).map(|d| d.name.as_str()).collect();
    assert_eq!(visible, vec!["list_buckets", "start_instance"]);
}
