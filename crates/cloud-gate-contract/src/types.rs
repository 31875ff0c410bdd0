// cloud-gate-contract/src/types.rs
// ============================================================================
// Module: Contract Types
// Description: Data shapes for the declarative operation catalog.
// Purpose: Carry operation identity and schema without behavior.
// Dependencies: cloud-gate-core, serde
// ============================================================================

//! ## Overview
//! [`OperationContract`] is the catalog entry: everything the registry needs
//! to register an operation except its handler. Contracts are plain data so
//! the catalog can be listed, diffed, and serialized without side effects.

// ============================================================================
// SECTION: Imports
// ============================================================================

use cloud_gate_core::ModuleTag;
use cloud_gate_core::OperationName;
use cloud_gate_core::ParameterSchema;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Operation Contract
// ============================================================================

/// One catalog entry: operation identity, module, description, and schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationContract {
    /// Unique operation name.
    pub name: OperationName,
    /// Module tag the operation gates on.
    pub module: ModuleTag,
    /// Human-readable description for tool listings.
    pub description: String,
    /// Parameter schema interpreted by the generic validator.
    pub schema: ParameterSchema,
}

impl OperationContract {
    /// Creates a contract.
    #[must_use]
    pub fn new(
        name: impl Into<OperationName>,
        module: impl Into<ModuleTag>,
        description: impl Into<String>,
        schema: ParameterSchema,
    ) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            description: description.into(),
            schema,
        }
    }
}
