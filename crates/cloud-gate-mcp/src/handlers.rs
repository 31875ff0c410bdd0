// cloud-gate-mcp/src/handlers.rs
// ============================================================================
// Module: Operation Handlers
// Description: Binds catalog contracts to connector-backed handlers.
// Purpose: Assemble the operation registry from declarative contracts.
// Dependencies: async-trait, cloud-gate-contract, cloud-gate-core
// ============================================================================

//! ## Overview
//! Registry assembly walks the contract catalog and binds each contract to a
//! handler: modules with a backend service get a [`ConnectorHandler`] over the
//! shared connector; placeholder modules get a [`NotImplementedHandler`] so
//! the advertised surface answers honestly instead of faking success.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use cloud_gate_contract::OperationContract;
use cloud_gate_core::HandlerError;
use cloud_gate_core::ModuleTag;
use cloud_gate_core::OperationDescriptor;
use cloud_gate_core::OperationHandler;
use cloud_gate_core::OperationName;
use cloud_gate_core::OperationRegistry;
use cloud_gate_core::RegistryError;
use cloud_gate_core::TypedParameters;
use serde_json::Value;

use crate::connector::CloudConnector;
use crate::connector::ConnectorCall;
use crate::connector::ServiceKind;

// ============================================================================
// SECTION: Module Binding
// ============================================================================

/// Returns the backend service for a module, or `None` for placeholder
/// modules without a backend yet.
#[must_use]
pub fn service_for_module(module: &ModuleTag) -> Option<ServiceKind> {
    match module.as_str() {
        "storage" => Some(ServiceKind::ObjectStorage),
        "compute" => Some(ServiceKind::Compute),
        "instance" => Some(ServiceKind::Identity),
        _ => None,
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handler forwarding validated parameters to the cloud connector.
pub struct ConnectorHandler {
    /// Target backend service.
    service: ServiceKind,
    /// Operation this handler serves.
    operation: OperationName,
    /// Shared connector.
    connector: Arc<dyn CloudConnector>,
}

impl ConnectorHandler {
    /// Creates a connector-backed handler.
    #[must_use]
    pub fn new(
        service: ServiceKind,
        operation: OperationName,
        connector: Arc<dyn CloudConnector>,
    ) -> Self {
        Self {
            service,
            operation,
            connector,
        }
    }
}

#[async_trait]
impl OperationHandler for ConnectorHandler {
    async fn invoke(&self, params: TypedParameters) -> Result<Value, HandlerError> {
        let call = ConnectorCall {
            service: self.service,
            operation: self.operation.clone(),
            payload: params.into_value(),
        };
        self.connector.call(call).await.map_err(|err| {
            if err.retryable {
                HandlerError::transient(err.message)
            } else {
                HandlerError::permanent(err.message)
            }
        })
    }
}

/// Handler for advertised operations whose backend is not built yet.
pub struct NotImplementedHandler {
    /// Operation this placeholder stands in for.
    operation: OperationName,
}

impl NotImplementedHandler {
    /// Creates a placeholder handler.
    #[must_use]
    pub fn new(operation: OperationName) -> Self {
        Self {
            operation,
        }
    }
}

#[async_trait]
impl OperationHandler for NotImplementedHandler {
    async fn invoke(&self, _params: TypedParameters) -> Result<Value, HandlerError> {
        Err(HandlerError::not_implemented(format!(
            "operation {} has no backend yet",
            self.operation
        )))
    }
}

// ============================================================================
// SECTION: Registry Assembly
// ============================================================================

/// Builds the operation registry from the contract catalog.
///
/// Registration is atomic per contract; a duplicate name or malformed schema
/// anywhere in the catalog fails startup.
///
/// # Errors
///
/// Returns [`RegistryError`] when any contract fails to register.
pub fn build_registry(
    catalog: Vec<OperationContract>,
    connector: Arc<dyn CloudConnector>,
) -> Result<OperationRegistry, RegistryError> {
    let mut registry = OperationRegistry::new();
    for contract in catalog {
        let handler: Arc<dyn OperationHandler> = match service_for_module(&contract.module) {
            Some(service) => Arc::new(ConnectorHandler::new(
                service,
                contract.name.clone(),
                Arc::clone(&connector),
            )),
            None => Arc::new(NotImplementedHandler::new(contract.name.clone())),
        };
        registry.register(OperationDescriptor {
            name: contract.name,
            module: contract.module,
            description: contract.description,
            schema: contract.schema,
            handler,
        })?;
    }
    Ok(registry)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
