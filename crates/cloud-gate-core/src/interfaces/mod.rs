// cloud-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Handler Interfaces
// Description: Trait boundary between the dispatcher and operation handlers.
// Purpose: Keep the dispatch pipeline independent of any concrete backend.
// Dependencies: async-trait, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`OperationHandler`] is the seam between the generic dispatch pipeline and
//! whatever performs the actual work: a cloud connector, a placeholder, or a
//! test fake. Handlers receive validated [`TypedParameters`] and return a raw
//! payload; classification into the failure taxonomy happens in the
//! dispatcher, keyed off [`HandlerError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::core::params::TypedParameters;

// ============================================================================
// SECTION: Operation Handler
// ============================================================================

/// Executes one operation against its backend.
///
/// Handlers see only validated parameters; they never re-validate. Handlers
/// must be cancellation-safe: the dispatcher drops the future on timeout.
#[async_trait]
pub trait OperationHandler: Send + Sync {
    /// Invokes the operation with validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when the backend call fails.
    async fn invoke(&self, params: TypedParameters) -> Result<Value, HandlerError>;
}

// ============================================================================
// SECTION: Handler Errors
// ============================================================================

/// Error reported by an operation handler.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HandlerError {
    /// Human-readable description of the backend failure.
    pub message: String,
    /// Whether the backend classified the failure as transient.
    pub retryable: bool,
    /// Whether the operation is advertised but not built yet.
    pub not_implemented: bool,
}

impl HandlerError {
    /// Creates a permanent backend failure.
    #[must_use]
    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
            not_implemented: false,
        }
    }

    /// Creates a transient backend failure the caller may retry.
    #[must_use]
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
            not_implemented: false,
        }
    }

    /// Creates a not-implemented marker for placeholder operations.
    #[must_use]
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
            not_implemented: true,
        }
    }
}
