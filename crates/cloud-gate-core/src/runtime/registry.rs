// cloud-gate-core/src/runtime/registry.rs
// ============================================================================
// Module: Operation Registry
// Description: Startup-built mapping from operation name to descriptor.
// Purpose: Resolve invocations and enumerate operations per module.
// Dependencies: crate::core, crate::interfaces, thiserror
// ============================================================================

//! ## Overview
//! The registry is assembled once at startup and read-only afterwards. Each
//! registration binds an operation name to its module tag, description,
//! parameter schema, and handler. Registration checks the schema and rejects
//! duplicate names atomically, so a half-registered operation never exists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::core::identifiers::ModuleTag;
use crate::core::identifiers::OperationName;
use crate::core::schema::ParameterSchema;
use crate::interfaces::OperationHandler;

// ============================================================================
// SECTION: Operation Descriptor
// ============================================================================

/// One registered operation: identity, schema, and handler.
#[derive(Clone)]
pub struct OperationDescriptor {
    /// Unique operation name.
    pub name: OperationName,
    /// Module tag the operation gates on.
    pub module: ModuleTag,
    /// Human-readable description for tool listings.
    pub description: String,
    /// Parameter schema interpreted by the validator.
    pub schema: ParameterSchema,
    /// Handler invoked after gating and validation.
    pub handler: Arc<dyn OperationHandler>,
}

impl fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Operation Registry
// ============================================================================

/// Name-keyed operation registry, built at startup and then read-only.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    /// Descriptors keyed by operation name, iterated in name order.
    operations: BTreeMap<OperationName, OperationDescriptor>,
}

impl OperationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one operation.
    ///
    /// The schema check and the duplicate check both pass before anything is
    /// inserted, so a failed registration leaves the registry unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] on a duplicate name or a malformed schema.
    pub fn register(&mut self, descriptor: OperationDescriptor) -> Result<(), RegistryError> {
        if self.operations.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateOperation {
                name: descriptor.name.clone(),
            });
        }
        descriptor.schema.check().map_err(|err| RegistryError::InvalidSchema {
            name: descriptor.name.clone(),
            reason: err.to_string(),
        })?;
        self.operations.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Resolves an operation by name.
    #[must_use]
    pub fn lookup(&self, name: &OperationName) -> Option<&OperationDescriptor> {
        self.operations.get(name)
    }

    /// Iterates over all descriptors in name order.
    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations.values()
    }

    /// Iterates over descriptors belonging to one module, in name order.
    pub fn list_by_module<'a>(
        &'a self,
        module: &'a ModuleTag,
    ) -> impl Iterator<Item = &'a OperationDescriptor> {
        self.operations.values().filter(move |descriptor| &descriptor.module == module)
    }

    /// Returns the number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true when no operations are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registration errors surfaced at startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An operation with this name is already registered.
    #[error("duplicate operation: {name}")]
    DuplicateOperation {
        /// Conflicting operation name.
        name: OperationName,
    },
    /// The operation's schema failed its structural check.
    #[error("invalid schema for operation {name}: {reason}")]
    InvalidSchema {
        /// Operation carrying the schema.
        name: OperationName,
        /// Schema check failure text.
        reason: String,
    },
}

// ============================================================================
// SECTION: Tests
// ============================================================================
