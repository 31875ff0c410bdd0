// cloud-gate-contract/src/lib.rs
// ============================================================================
// Module: Cloud Gate Contract Library
// Description: Canonical operation contracts for the dispatch gateway.
// Purpose: Provide the declarative catalog consumed by registry assembly.
// Dependencies: cloud-gate-core, serde, serde_json
// ============================================================================

//! ## Overview
//! `cloud-gate-contract` defines the canonical operation surface as pure data:
//! each module contributes [`OperationContract`] values carrying name, module
//! tag, description, and parameter schema. No validation logic lives here; a
//! single generic validator in the core crate interprets every schema.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod compute;
pub mod instance;
pub mod placeholders;
pub mod storage;
pub mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use types::OperationContract;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Returns the full operation catalog in stable module order.
///
/// Registration sorts operations by name; the module order here only keeps
/// the source readable. Append new operations at the end of their section.
#[must_use]
pub fn operation_catalog() -> Vec<OperationContract> {
    let mut catalog = Vec::new();
    catalog.extend(storage::contracts());
    catalog.extend(compute::contracts());
    catalog.extend(instance::contracts());
    catalog.extend(placeholders::contracts());
    catalog
}

// ============================================================================
// SECTION: Tests
// ============================================================================
