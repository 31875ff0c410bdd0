// cloud-gate-mcp/src/audit.rs
// ============================================================================
// Module: Invocation Audit Logging
// Description: Structured audit events for dispatched invocations.
// Purpose: Emit redacted audit lines without hard logging dependencies.
// Dependencies: cloud-gate-config, cloud-gate-core, serde
// ============================================================================

//! ## Overview
//! One audit event per dispatched invocation: operation, module, terminal
//! stage, outcome, failure kind, and timing. Events carry only classification
//! labels and identifiers, never parameter values, so the sink can be pointed
//! anywhere. Sinks are deliberately lightweight; deployments route the JSON
//! lines into their own pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use cloud_gate_config::AuditConfig;
use cloud_gate_config::AuditSinkKind;
use cloud_gate_core::DispatchOutcome;
use cloud_gate_core::DispatchStage;
use cloud_gate_core::InvocationResult;
use cloud_gate_core::OperationName;
use serde::Serialize;

// ============================================================================
// SECTION: Event
// ============================================================================

/// Audit payload for one dispatched invocation.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Caller correlation identifier when provided.
    pub request_id: Option<String>,
    /// Requested operation name.
    pub operation: String,
    /// Terminal pipeline stage label.
    pub stage: &'static str,
    /// Outcome label: `success` or `failure`.
    pub outcome: &'static str,
    /// Failure kind label when the outcome is a failure.
    pub failure_kind: Option<&'static str>,
    /// Retryability hint when the outcome is a failure.
    pub retryable: Option<bool>,
    /// Whether the handler was actually invoked.
    pub handler_invoked: bool,
    /// Wall-clock dispatch duration in milliseconds.
    pub duration_ms: u64,
    /// Whether the payload was truncated.
    pub truncated: bool,
}

impl InvocationAuditEvent {
    /// Builds an event from a dispatch outcome.
    #[must_use]
    pub fn from_outcome(operation: &OperationName, outcome: &DispatchOutcome) -> Self {
        let metadata = outcome.result.metadata();
        let (outcome_label, failure_kind, retryable) = match &outcome.result {
            InvocationResult::Success {
                ..
            } => ("success", None, None),
            InvocationResult::Failure {
                failure, ..
            } => ("failure", Some(failure.kind.label()), Some(failure.retryable)),
        };
        Self {
            event: "invocation",
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |elapsed| elapsed.as_millis()),
            request_id: metadata.request_id.as_ref().map(|id| id.as_str().to_string()),
            operation: operation.as_str().to_string(),
            stage: stage_label(outcome.stage),
            outcome: outcome_label,
            failure_kind,
            retryable,
            handler_invoked: outcome.handler_invoked,
            duration_ms: metadata.duration_ms,
            truncated: metadata.truncated,
        }
    }
}

/// Returns the stable label for a dispatch stage.
const fn stage_label(stage: DispatchStage) -> &'static str {
    match stage {
        DispatchStage::Received => "received",
        DispatchStage::Gated => "gated",
        DispatchStage::Validated => "validated",
        DispatchStage::Invoking => "invoking",
        DispatchStage::Completed => "completed",
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for invocation events.
pub trait AuditSink: Send + Sync {
    /// Records an audit event.
    fn record(&self, event: &InvocationAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &InvocationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to an append-only file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &InvocationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &InvocationAuditEvent) {}
}

/// Builds the configured audit sink.
///
/// # Errors
///
/// Returns an error when the file sink cannot be opened.
pub fn build_audit_sink(config: &AuditConfig) -> io::Result<Arc<dyn AuditSink>> {
    match config.sink {
        AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
        AuditSinkKind::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "file audit sink requires a path")
            })?;
            Ok(Arc::new(FileAuditSink::new(path)?))
        }
        AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
    }
}
