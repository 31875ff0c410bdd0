// cloud-gate-core/src/core/envelope.rs
// ============================================================================
// Module: Response Envelope
// Description: Uniform request/response shapes crossing the gateway boundary.
// Purpose: Give every invocation outcome the same wire-facing structure.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Requests enter as an [`InvocationRequest`] and every outcome leaves as an
//! [`Envelope`]: success flag, payload or failure, and response metadata. The
//! envelope shape is identical for success and failure so callers never branch
//! on structure, only on the `success` flag and the failure `kind`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::failure::Failure;
use crate::core::failure::FailureKind;
use crate::core::identifiers::OperationName;
use crate::core::identifiers::RequestId;

// ============================================================================
// SECTION: Invocation Request
// ============================================================================

/// One inbound operation invocation before gating and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Requested operation name.
    pub operation: OperationName,
    /// Raw caller-supplied parameters, unvalidated.
    #[serde(default)]
    pub raw_parameters: Map<String, Value>,
    /// Optional caller correlation identifier, echoed in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

impl InvocationRequest {
    /// Creates a request with no parameters.
    #[must_use]
    pub fn new(operation: impl Into<OperationName>) -> Self {
        Self {
            operation: operation.into(),
            raw_parameters: Map::new(),
            request_id: None,
        }
    }

    /// Adds a raw parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.raw_parameters.insert(name.into(), value);
        self
    }

    /// Sets the correlation identifier.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<RequestId>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

// ============================================================================
// SECTION: Invocation Result
// ============================================================================

/// Terminal outcome of one dispatch, before envelope serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationResult {
    /// Handler produced a payload.
    Success {
        /// Normalized payload value.
        payload: Value,
        /// Response metadata.
        metadata: ResponseMetadata,
    },
    /// Dispatch terminated with a classified failure.
    Failure {
        /// Normalized failure.
        failure: Failure,
        /// Response metadata.
        metadata: ResponseMetadata,
    },
}

impl InvocationResult {
    /// Returns true for successful outcomes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Success {
                ..
            }
        )
    }

    /// Returns the failure when the outcome is a failure.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Success {
                ..
            } => None,
            Self::Failure {
                failure, ..
            } => Some(failure),
        }
    }

    /// Returns the response metadata for either outcome.
    #[must_use]
    pub const fn metadata(&self) -> &ResponseMetadata {
        match self {
            Self::Success {
                metadata, ..
            }
            | Self::Failure {
                metadata, ..
            } => metadata,
        }
    }

    /// Converts the outcome into the uniform wire envelope.
    #[must_use]
    pub fn into_envelope(self) -> Envelope {
        match self {
            Self::Success {
                payload,
                metadata,
            } => Envelope {
                success: true,
                data: Some(payload),
                error: None,
                metadata,
            },
            Self::Failure {
                failure,
                metadata,
            } => Envelope {
                success: false,
                data: None,
                error: Some(FailurePayload::from(failure)),
                metadata,
            },
        }
    }
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Uniform wire-facing response envelope.
///
/// # Invariants
/// - `success == true` implies `data` is present and `error` is absent.
/// - `success == false` implies `error` is present and `data` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Whether the invocation succeeded.
    pub success: bool,
    /// Normalized payload, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Classified failure, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FailurePayload>,
    /// Response metadata, always present.
    pub metadata: ResponseMetadata,
}

/// Failure projection carried inside the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailurePayload {
    /// Failure classification with kind-specific detail fields.
    #[serde(flatten)]
    pub kind: FailureKind,
    /// Sanitized human-readable message.
    pub message: String,
    /// Hint that the caller may retry the invocation.
    pub retryable: bool,
}

impl From<Failure> for FailurePayload {
    fn from(failure: Failure) -> Self {
        Self {
            kind: failure.kind,
            message: failure.message,
            retryable: failure.retryable,
        }
    }
}

// ============================================================================
// SECTION: Response Metadata
// ============================================================================

/// Metadata attached to every envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Wall-clock duration of the dispatch in milliseconds.
    pub duration_ms: u64,
    /// Unix epoch milliseconds when the response was produced.
    pub timestamp_ms: u128,
    /// Whether the payload was truncated to fit the size limit.
    pub truncated: bool,
    /// Caller correlation identifier, echoed when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

impl ResponseMetadata {
    /// Creates metadata stamped with the current wall-clock time.
    #[must_use]
    pub fn now(duration_ms: u64, request_id: Option<RequestId>) -> Self {
        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis());
        Self {
            duration_ms,
            timestamp_ms,
            truncated: false,
            request_id,
        }
    }
}
