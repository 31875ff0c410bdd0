// cloud-gate-mcp/src/lib.rs
// ============================================================================
// Module: Cloud Gate MCP
// Description: MCP server exposing the dispatch gateway as tools.
// Purpose: Provide tool listing and invocation over stdio and HTTP.
// Dependencies: cloud-gate-core, cloud-gate-contract, axum, tokio
// ============================================================================

//! ## Overview
//! Cloud Gate MCP exposes the operation catalog as MCP tools. Every tool call
//! flows through the core dispatch pipeline and leaves as the uniform
//! envelope; transport errors are reserved for malformed JSON-RPC. Cloud
//! provider I/O lives behind the [`connector::CloudConnector`] seam.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod connector;
pub mod handlers;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::InvocationAuditEvent;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use connector::CloudConnector;
pub use connector::ConnectorCall;
pub use connector::ConnectorError;
pub use connector::HttpConnector;
pub use connector::ServiceKind;
pub use handlers::build_registry;
pub use server::McpServer;
pub use server::McpServerError;
