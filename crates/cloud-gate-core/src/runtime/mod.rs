// cloud-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Dispatch Runtime
// Description: Registry, gate, validator, dispatcher, and normalizer.
// Purpose: Group the components of the dispatch pipeline.
// Dependencies: crate::runtime::{registry, gate, validator, dispatcher, normalizer}
// ============================================================================

//! ## Overview
//! The dispatch pipeline: an [`OperationRegistry`] resolves names, a
//! [`FeatureGate`] applies module flags, [`validate`] coerces raw parameters,
//! the [`Dispatcher`] drives the invocation through its stages, and the
//! [`ResponseNormalizer`] shapes every outcome into the uniform envelope.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dispatcher;
pub mod gate;
pub mod normalizer;
pub mod registry;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dispatcher::DispatchOutcome;
pub use dispatcher::DispatchStage;
pub use dispatcher::Dispatcher;
pub use dispatcher::DispatcherConfig;
pub use gate::FeatureGate;
pub use gate::ModuleFlags;
pub use normalizer::ResponseNormalizer;
pub use registry::OperationDescriptor;
pub use registry::OperationRegistry;
pub use registry::RegistryError;
pub use validator::validate;
