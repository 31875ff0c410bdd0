// cloud-gate-core/src/core/failure.rs
// ============================================================================
// Module: Failure Taxonomy
// Description: Structured failure kinds surfaced through the response envelope.
// Purpose: Classify every gateway outcome; no raw error escapes unnormalized.
// Dependencies: regex, serde
// ============================================================================

//! ## Overview
//! Every failed invocation is expressed as a [`Failure`]: a stable kind, a
//! sanitized human-readable message, and a retryability hint. Validation
//! failures are caller errors and never retryable; timeouts are retryable;
//! handler failures inherit the collaborator's own classification. Messages
//! pass through [`sanitize_message`] in the constructors so credential-like
//! tokens and cloud resource identifiers never leave the gateway.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ModuleTag;
use crate::core::identifiers::OperationName;

// ============================================================================
// SECTION: Failure Kinds
// ============================================================================

/// Stable classification of invocation failures.
///
/// # Invariants
/// - Variants are stable; transports and clients key behavior off `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// Operation name not present in the registry.
    NotFound,
    /// Operation exists but its module is gated off.
    ModuleDisabled {
        /// Disabled module tag.
        module: ModuleTag,
    },
    /// Required field absent from raw parameters.
    MissingField {
        /// Missing field name (dotted path for nested fields).
        field: String,
    },
    /// Raw value could not be coerced to the declared type.
    InvalidType {
        /// Offending field name (dotted path for nested fields).
        field: String,
        /// Declared type label.
        expected: String,
    },
    /// Enumerated field value matched none of the allowed literals.
    InvalidEnum {
        /// Offending field name.
        field: String,
        /// Allowed literal values.
        allowed: Vec<String>,
    },
    /// A field-level constraint was violated.
    Constraint {
        /// Offending field name.
        field: String,
        /// Stable constraint label (for example `minLength`).
        constraint: String,
    },
    /// Raw parameters contained a field not declared in the schema.
    UnknownField {
        /// Unexpected field name.
        field: String,
    },
    /// Handler exceeded the configured invocation timeout.
    Timeout,
    /// In-flight invocation was cancelled.
    Cancelled,
    /// Operation is advertised but not built yet.
    NotImplemented,
    /// The external collaborator reported an error.
    Handler,
}

impl FailureKind {
    /// Returns the stable snake_case label for this kind.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::ModuleDisabled {
                ..
            } => "module_disabled",
            Self::MissingField {
                ..
            } => "missing_field",
            Self::InvalidType {
                ..
            } => "invalid_type",
            Self::InvalidEnum {
                ..
            } => "invalid_enum",
            Self::Constraint {
                ..
            } => "constraint",
            Self::UnknownField {
                ..
            } => "unknown_field",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::NotImplemented => "not_implemented",
            Self::Handler => "handler",
        }
    }

    /// Returns the default retryability for this kind.
    ///
    /// Handler failures do not use this default; they inherit the
    /// collaborator's classification via [`Failure::handler`].
    #[must_use]
    pub const fn default_retryable(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

// ============================================================================
// SECTION: Failure
// ============================================================================

/// One normalized invocation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Failure classification.
    pub kind: FailureKind,
    /// Sanitized human-readable message.
    pub message: String,
    /// Hint that the caller may retry the invocation.
    pub retryable: bool,
}

impl Failure {
    /// Creates a failure with the kind's default retryability.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        let retryable = kind.default_retryable();
        Self {
            kind,
            message: sanitize_message(&message.into()),
            retryable,
        }
    }

    /// Unknown operation name.
    #[must_use]
    pub fn not_found(operation: &OperationName) -> Self {
        Self::new(FailureKind::NotFound, format!("unknown operation: {operation}"))
    }

    /// Operation gated off by module flags.
    #[must_use]
    pub fn module_disabled(module: ModuleTag) -> Self {
        let message = format!("module {module} is disabled by configuration");
        Self::new(
            FailureKind::ModuleDisabled {
                module,
            },
            message,
        )
    }

    /// Required field absent.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("required field {field} is missing");
        Self::new(
            FailureKind::MissingField {
                field,
            },
            message,
        )
    }

    /// Type coercion failure.
    #[must_use]
    pub fn invalid_type(field: impl Into<String>, expected: &'static str) -> Self {
        let field = field.into();
        let message = format!("field {field} must be of type {expected}");
        Self::new(
            FailureKind::InvalidType {
                field,
                expected: expected.to_string(),
            },
            message,
        )
    }

    /// Enum literal mismatch.
    #[must_use]
    pub fn invalid_enum(field: impl Into<String>, allowed: Vec<String>) -> Self {
        let field = field.into();
        let message = format!("field {field} must be one of: {}", allowed.join(", "));
        Self::new(
            FailureKind::InvalidEnum {
                field,
                allowed,
            },
            message,
        )
    }

    /// Constraint violation.
    #[must_use]
    pub fn constraint(field: impl Into<String>, constraint: &'static str) -> Self {
        let field = field.into();
        let message = format!("field {field} violates constraint {constraint}");
        Self::new(
            FailureKind::Constraint {
                field,
                constraint: constraint.to_string(),
            },
            message,
        )
    }

    /// Unknown field in strict mode.
    #[must_use]
    pub fn unknown_field(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("unknown field: {field}");
        Self::new(
            FailureKind::UnknownField {
                field,
            },
            message,
        )
    }

    /// Handler exceeded the invocation timeout.
    #[must_use]
    pub fn timeout(operation: &OperationName, timeout_ms: u64) -> Self {
        Self::new(
            FailureKind::Timeout,
            format!("operation {operation} exceeded the {timeout_ms} ms timeout"),
        )
    }

    /// In-flight invocation cancelled.
    #[must_use]
    pub fn cancelled(operation: &OperationName) -> Self {
        Self::new(FailureKind::Cancelled, format!("operation {operation} was cancelled"))
    }

    /// Operation advertised but not built yet.
    #[must_use]
    pub fn not_implemented(operation: &OperationName) -> Self {
        Self::new(
            FailureKind::NotImplemented,
            format!("operation {operation} is not implemented yet"),
        )
    }

    /// Collaborator failure; retryability is inherited, not re-derived.
    #[must_use]
    pub fn handler(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind: FailureKind::Handler,
            message: sanitize_message(&message.into()),
            retryable,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

// ============================================================================
// SECTION: Message Sanitizer
// ============================================================================

/// Replacement marker for redacted resource identifiers.
const REDACTED_RESOURCE: &str = "[redacted:resource]";
/// Replacement marker for redacted credential material.
const REDACTED_CREDENTIAL: &str = "[redacted:credential]";

/// Compiled pattern for cloud resource identifiers (OCID-shaped strings).
fn resource_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used, reason = "Pattern is a compile-time constant.")]
        Regex::new(r"(?i)ocid1\.[a-z0-9]+(\.[a-z0-9-]*){2,}\.[a-z0-9]+")
            .expect("resource pattern is valid")
    })
}

/// Compiled pattern for bearer tokens and long opaque secrets.
fn credential_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used, reason = "Pattern is a compile-time constant.")]
        Regex::new(r"(?i)bearer\s+[a-z0-9._~+/=-]+|[A-Za-z0-9+/_=-]{48,}")
            .expect("credential pattern is valid")
    })
}

/// Strips credential-like tokens and cloud resource identifiers from a
/// message. Handlers should already redact; the gateway boundary re-checks.
#[must_use]
pub fn sanitize_message(message: &str) -> String {
    let message = resource_pattern().replace_all(message, REDACTED_RESOURCE);
    credential_pattern().replace_all(&message, REDACTED_CREDENTIAL).into_owned()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
