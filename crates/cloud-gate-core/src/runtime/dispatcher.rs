// cloud-gate-core/src/runtime/dispatcher.rs
// ============================================================================
// Module: Dispatcher
// Description: Staged dispatch pipeline from request to normalized outcome.
// Purpose: Drive lookup, gating, validation, invocation, and normalization.
// Dependencies: crate::core, crate::interfaces, crate::runtime, tokio
// ============================================================================

//! ## Overview
//! The dispatcher advances each request through a fixed stage order: lookup,
//! gate, validate, invoke, normalize. Stage order never varies and nothing is
//! skipped; a terminal failure at any stage still exits through the
//! normalizer. Gating runs before validation so a disabled module never
//! leaks validation detail about its operations. Handlers run under a
//! timeout; the dispatcher itself never retries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use crate::core::envelope::InvocationRequest;
use crate::core::envelope::InvocationResult;
use crate::core::envelope::ResponseMetadata;
use crate::core::failure::Failure;
use crate::interfaces::HandlerError;
use crate::runtime::gate::FeatureGate;
use crate::runtime::normalizer::ResponseNormalizer;
use crate::runtime::registry::OperationRegistry;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default handler invocation timeout in milliseconds.
pub const DEFAULT_INVOKE_TIMEOUT_MS: u64 = 30_000;

// ============================================================================
// SECTION: Dispatch Stages
// ============================================================================

/// Pipeline stage at which a dispatch produced its terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DispatchStage {
    /// Request received; operation lookup failed.
    Received,
    /// Operation resolved; the feature gate refused it.
    Gated,
    /// Gate passed; parameter validation failed.
    Validated,
    /// Validation passed; the handler invocation failed or timed out.
    Invoking,
    /// Handler completed and the payload was normalized.
    Completed,
}

/// Terminal outcome of one dispatch with pipeline bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    /// Normalized invocation result.
    pub result: InvocationResult,
    /// Stage that produced the terminal outcome.
    pub stage: DispatchStage,
    /// Whether the handler was actually invoked.
    pub handler_invoked: bool,
}

// ============================================================================
// SECTION: Dispatcher Configuration
// ============================================================================

/// Tunable dispatcher settings.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Handler invocation timeout.
    pub invoke_timeout: Duration,
    /// Maximum serialized payload size before truncation.
    pub max_payload_bytes: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            invoke_timeout: Duration::from_millis(DEFAULT_INVOKE_TIMEOUT_MS),
            max_payload_bytes: crate::runtime::normalizer::DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Drives requests through the dispatch pipeline.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    /// Read-only operation registry.
    registry: Arc<OperationRegistry>,
    /// Module-level feature gate.
    gate: FeatureGate,
    /// Outcome normalizer.
    normalizer: ResponseNormalizer,
    /// Handler invocation timeout.
    invoke_timeout: Duration,
}

impl Dispatcher {
    /// Creates a dispatcher over a registry and gate.
    #[must_use]
    pub fn new(registry: Arc<OperationRegistry>, gate: FeatureGate, config: DispatcherConfig) -> Self {
        Self {
            registry,
            gate,
            normalizer: ResponseNormalizer::new(config.max_payload_bytes),
            invoke_timeout: config.invoke_timeout,
        }
    }

    /// Returns the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    /// Returns the feature gate.
    #[must_use]
    pub const fn gate(&self) -> &FeatureGate {
        &self.gate
    }

    /// Dispatches one invocation request to its terminal outcome.
    ///
    /// Every path exits through the normalizer; the returned outcome always
    /// carries complete response metadata.
    pub async fn dispatch(&self, request: InvocationRequest) -> DispatchOutcome {
        let started = Instant::now();
        let request_id = request.request_id.clone();

        let Some(descriptor) = self.registry.lookup(&request.operation) else {
            return self.fail(
                Failure::not_found(&request.operation),
                DispatchStage::Received,
                started,
                request_id,
            );
        };

        if !self.gate.is_enabled(&descriptor.module) {
            return self.fail(
                Failure::module_disabled(descriptor.module.clone()),
                DispatchStage::Gated,
                started,
                request_id,
            );
        }

        let params = match crate::runtime::validator::validate(
            &descriptor.schema,
            &request.raw_parameters,
        ) {
            Ok(params) => params,
            Err(failure) => {
                return self.fail(failure, DispatchStage::Validated, started, request_id);
            }
        };

        let invoked = tokio::time::timeout(self.invoke_timeout, descriptor.handler.invoke(params));
        match invoked.await {
            Ok(Ok(payload)) => {
                let metadata = self.metadata(started, request_id);
                DispatchOutcome {
                    result: self.normalizer.success(payload, metadata),
                    stage: DispatchStage::Completed,
                    handler_invoked: true,
                }
            }
            Ok(Err(error)) => {
                let failure = classify_handler_error(&request.operation, error);
                let metadata = self.metadata(started, request_id);
                DispatchOutcome {
                    result: self.normalizer.failure(failure, metadata),
                    stage: DispatchStage::Invoking,
                    handler_invoked: true,
                }
            }
            Err(_) => {
                let timeout_ms = u64::try_from(self.invoke_timeout.as_millis()).unwrap_or(u64::MAX);
                let failure = Failure::timeout(&request.operation, timeout_ms);
                let metadata = self.metadata(started, request_id);
                DispatchOutcome {
                    result: self.normalizer.failure(failure, metadata),
                    stage: DispatchStage::Invoking,
                    handler_invoked: true,
                }
            }
        }
    }

    /// Builds a failure outcome for a pre-invocation stage.
    fn fail(
        &self,
        failure: Failure,
        stage: DispatchStage,
        started: Instant,
        request_id: Option<crate::core::identifiers::RequestId>,
    ) -> DispatchOutcome {
        let metadata = self.metadata(started, request_id);
        DispatchOutcome {
            result: self.normalizer.failure(failure, metadata),
            stage,
            handler_invoked: false,
        }
    }

    /// Stamps response metadata with the elapsed dispatch time.
    fn metadata(
        &self,
        started: Instant,
        request_id: Option<crate::core::identifiers::RequestId>,
    ) -> ResponseMetadata {
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        ResponseMetadata::now(duration_ms, request_id)
    }
}

/// Maps a handler error onto the failure taxonomy.
fn classify_handler_error(
    operation: &crate::core::identifiers::OperationName,
    error: HandlerError,
) -> Failure {
    if error.not_implemented {
        Failure::not_implemented(operation)
    } else {
        Failure::handler(error.message, error.retryable)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
