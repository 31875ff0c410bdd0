// cloud-gate-core/src/lib.rs
// ============================================================================
// Module: Cloud Gate Core Library
// Description: Public API surface for the Cloud Gate dispatch gateway.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Cloud Gate core provides the tool-dispatch and validation gateway: a static
//! operation registry, module feature gating, schema-driven parameter
//! validation, a dispatch state machine, and uniform response normalization.
//! Cloud-provider behavior stays behind the [`interfaces::OperationHandler`]
//! seam; the gateway itself performs no provider I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::HandlerError;
pub use interfaces::OperationHandler;
pub use runtime::DispatchOutcome;
pub use runtime::DispatchStage;
pub use runtime::Dispatcher;
pub use runtime::DispatcherConfig;
pub use runtime::FeatureGate;
pub use runtime::ModuleFlags;
pub use runtime::OperationDescriptor;
pub use runtime::OperationRegistry;
pub use runtime::RegistryError;
pub use runtime::ResponseNormalizer;
pub use runtime::validate;
