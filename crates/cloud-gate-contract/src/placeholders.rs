// cloud-gate-contract/src/placeholders.rs
// ============================================================================
// Module: Placeholder Contracts
// Description: Advertised operations whose backends are not built yet.
// Purpose: Keep the tool surface stable while modules land incrementally.
// Dependencies: cloud-gate-core, serde_json
// ============================================================================

//! ## Overview
//! The `catalog`, `notebooks`, and `jobs` modules are advertised but unbuilt:
//! registry assembly binds every contract here to a not-implemented handler,
//! so callers get an honest `not_implemented` failure instead of a canned
//! success. Operators typically disable these modules until they ship.

// ============================================================================
// SECTION: Imports
// ============================================================================

use cloud_gate_core::Constraint;
use cloud_gate_core::FieldDescriptor;
use cloud_gate_core::FieldType;
use cloud_gate_core::ParameterSchema;
use serde_json::json;

use crate::types::OperationContract;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Module tag for data catalog operations.
pub const CATALOG_MODULE: &str = "catalog";
/// Module tag for notebook operations.
pub const NOTEBOOKS_MODULE: &str = "notebooks";
/// Module tag for job scheduling operations.
pub const JOBS_MODULE: &str = "jobs";

// ============================================================================
// SECTION: Contracts
// ============================================================================

/// Returns all placeholder contracts in listing order.
#[must_use]
pub fn contracts() -> Vec<OperationContract> {
    let mut contracts = catalog_contracts();
    contracts.extend(notebook_contracts());
    contracts.extend(job_contracts());
    contracts
}

/// Field declaring an opaque catalog object identifier.
fn object_id_field() -> FieldDescriptor {
    FieldDescriptor::required("object_id", FieldType::String)
        .with_constraint(Constraint::MinLength(1))
        .with_constraint(Constraint::MaxLength(512))
        .with_description("Catalog object identifier")
}

/// Data catalog placeholder contracts.
fn catalog_contracts() -> Vec<OperationContract> {
    vec![
        OperationContract::new(
            "list_catalog_objects",
            CATALOG_MODULE,
            "Browse the data catalog with optional filters",
            ParameterSchema::new(vec![
                FieldDescriptor::optional("limit", FieldType::integer())
                    .with_default(json!(100))
                    .with_constraint(Constraint::Min(1))
                    .with_constraint(Constraint::Max(1000))
                    .with_description("Maximum number of objects to return"),
                FieldDescriptor::optional("filter", FieldType::String)
                    .with_constraint(Constraint::MaxLength(1024))
                    .with_description("Filter expression"),
            ]),
        ),
        OperationContract::new(
            "search_catalog",
            CATALOG_MODULE,
            "Search the data catalog by keyword",
            ParameterSchema::new(vec![
                FieldDescriptor::required("query", FieldType::String)
                    .with_constraint(Constraint::MinLength(1))
                    .with_constraint(Constraint::MaxLength(1024))
                    .with_description("Search keywords"),
                FieldDescriptor::optional("limit", FieldType::integer())
                    .with_default(json!(100))
                    .with_constraint(Constraint::Min(1))
                    .with_constraint(Constraint::Max(1000))
                    .with_description("Maximum number of results"),
            ]),
        ),
        OperationContract::new(
            "get_data_lineage",
            CATALOG_MODULE,
            "View the lineage graph for a catalog object",
            ParameterSchema::new(vec![object_id_field()]),
        ),
    ]
}

/// Notebook placeholder contracts.
fn notebook_contracts() -> Vec<OperationContract> {
    vec![
        OperationContract::new(
            "list_notebook_sessions",
            NOTEBOOKS_MODULE,
            "List notebook sessions",
            ParameterSchema::new(vec![
                FieldDescriptor::optional("limit", FieldType::integer())
                    .with_default(json!(100))
                    .with_constraint(Constraint::Min(1))
                    .with_constraint(Constraint::Max(1000))
                    .with_description("Maximum number of sessions to return"),
            ]),
        ),
        OperationContract::new(
            "create_notebook_session",
            NOTEBOOKS_MODULE,
            "Create a new notebook session",
            ParameterSchema::new(vec![
                FieldDescriptor::required("session_name", FieldType::String)
                    .with_constraint(Constraint::MinLength(1))
                    .with_constraint(Constraint::MaxLength(255))
                    .with_description("Name for the session"),
                FieldDescriptor::optional("shape", FieldType::String)
                    .with_default(json!("VM.Standard2.1"))
                    .with_description("Compute shape for the session"),
            ]),
        ),
    ]
}

/// Job scheduling placeholder contracts.
fn job_contracts() -> Vec<OperationContract> {
    vec![
        OperationContract::new(
            "list_jobs",
            JOBS_MODULE,
            "List scheduled jobs",
            ParameterSchema::new(vec![
                FieldDescriptor::optional("limit", FieldType::integer())
                    .with_default(json!(100))
                    .with_constraint(Constraint::Min(1))
                    .with_constraint(Constraint::Max(1000))
                    .with_description("Maximum number of jobs to return"),
            ]),
        ),
        OperationContract::new(
            "run_job",
            JOBS_MODULE,
            "Trigger an immediate run of a scheduled job",
            ParameterSchema::new(vec![
                FieldDescriptor::required("job_id", FieldType::String)
                    .with_constraint(Constraint::MinLength(1))
                    .with_constraint(Constraint::MaxLength(512))
                    .with_description("Job identifier"),
            ]),
        ),
    ]
}
