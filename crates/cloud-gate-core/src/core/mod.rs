// cloud-gate-core/src/core/mod.rs
// ============================================================================
// Module: Cloud Gate Core Types
// Description: Data model shared across the dispatch gateway.
// Purpose: Group identifier, schema, failure, and envelope types.
// Dependencies: crate::core::{identifiers, schema, params, failure, envelope}
// ============================================================================

//! ## Overview
//! The core data model: opaque identifiers, declarative parameter schemas,
//! the failure taxonomy, typed parameters, and the response envelope.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod envelope;
pub mod failure;
pub mod identifiers;
pub mod params;
pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use envelope::Envelope;
pub use envelope::FailurePayload;
pub use envelope::InvocationRequest;
pub use envelope::InvocationResult;
pub use envelope::ResponseMetadata;
pub use failure::Failure;
pub use failure::FailureKind;
pub use failure::sanitize_message;
pub use identifiers::ModuleTag;
pub use identifiers::OperationName;
pub use identifiers::RequestId;
pub use params::TypedParameters;
pub use schema::Constraint;
pub use schema::FieldDescriptor;
pub use schema::FieldType;
pub use schema::ParameterSchema;
pub use schema::SchemaError;
