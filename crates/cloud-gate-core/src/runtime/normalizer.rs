// cloud-gate-core/src/runtime/normalizer.rs
// ============================================================================
// Module: Response Normalizer
// Description: Shapes raw handler output and failures into the envelope.
// Purpose: Enforce payload size limits and boundary sanitization.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! Every outcome passes through the normalizer on its way out. Success
//! payloads larger than the configured limit are replaced by a string prefix
//! of their serialized form with the `truncated` metadata flag set, so a
//! misbehaving backend cannot blow out the transport. Failure messages are
//! sanitized once more at this boundary even though the constructors already
//! did so.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::envelope::InvocationResult;
use crate::core::envelope::ResponseMetadata;
use crate::core::failure::Failure;
use crate::core::failure::sanitize_message;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum serialized payload size in bytes.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1_048_576;

// ============================================================================
// SECTION: Response Normalizer
// ============================================================================

/// Normalizes raw outcomes into uniform invocation results.
#[derive(Debug, Clone)]
pub struct ResponseNormalizer {
    /// Maximum serialized payload size before truncation.
    max_payload_bytes: usize,
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl ResponseNormalizer {
    /// Creates a normalizer with the given payload size limit.
    #[must_use]
    pub fn new(max_payload_bytes: usize) -> Self {
        Self {
            max_payload_bytes,
        }
    }

    /// Normalizes a successful handler payload.
    ///
    /// Oversized payloads are replaced by a prefix of their serialized form,
    /// cut at a character boundary, and the metadata `truncated` flag is set.
    #[must_use]
    pub fn success(&self, payload: Value, mut metadata: ResponseMetadata) -> InvocationResult {
        let serialized = payload.to_string();
        if serialized.len() <= self.max_payload_bytes {
            return InvocationResult::Success {
                payload,
                metadata,
            };
        }
        let mut cut = self.max_payload_bytes;
        while cut > 0 && !serialized.is_char_boundary(cut) {
            cut -= 1;
        }
        metadata.truncated = true;
        InvocationResult::Success {
            payload: Value::String(serialized[..cut].to_string()),
            metadata,
        }
    }

    /// Normalizes a classified failure, re-sanitizing its message at the
    /// boundary.
    #[must_use]
    pub fn failure(&self, mut failure: Failure, metadata: ResponseMetadata) -> InvocationResult {
        failure.message = sanitize_message(&failure.message);
        InvocationResult::Failure {
            failure,
            metadata,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
