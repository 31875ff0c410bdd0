// cloud-gate-contract/src/instance.rs
// ============================================================================
// Module: Instance Administration Contracts
// Description: Operation contracts for the instance and workspace module.
// Purpose: Declare instance status and workspace lifecycle operations.
// Dependencies: cloud-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Contracts for the `instance` module: platform instance health plus
//! workspace lifecycle and access control. Workspace access roles form a
//! closed enum so role typos fail validation instead of reaching identity
//! management.

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

/// Module tag for instance operations.
pub const MODULE: &str = "instance";

// ============================================================================
// SECTION: Contracts
// ============================================================================

/// Returns the instance contracts in listing order.
#[must_use]
pub fn contracts() -> Vec<OperationContract> {
    vec![
        get_instance_status(),
        list_workspaces(),
        create_workspace(),
        get_workspace_details(),
        delete_workspace(),
        grant_workspace_access(),
    ]
}

/// Field declaring a workspace name.
fn workspace_name_field(description: &str) -> FieldDescriptor {
    FieldDescriptor::required("workspace_name", FieldType::String)
        .with_constraint(Constraint::MinLength(1))
        .with_constraint(Constraint::MaxLength(255))
        .with_description(description)
}

/// Contract for `get_instance_status`.
fn get_instance_status() -> OperationContract {
    OperationContract::new(
        "get_instance_status",
        MODULE,
        "Get platform instance details, health status, and capabilities",
        ParameterSchema::empty(),
    )
}

/// Contract for `list_workspaces`.
fn list_workspaces() -> OperationContract {
    OperationContract::new(
        "list_workspaces",
        MODULE,
        "List all workspaces in the platform instance",
        ParameterSchema::new(vec![
            FieldDescriptor::optional("limit", FieldType::integer())
                .with_default(json!(100))
                .with_constraint(Constraint::Min(1))
                .with_constraint(Constraint::Max(1000))
                .with_description("Maximum number of workspaces to return"),
        ]),
    )
}

/// Contract for `create_workspace`.
fn create_workspace() -> OperationContract {
    OperationContract::new(
        "create_workspace",
        MODULE,
        "Create a new workspace in the platform instance",
        ParameterSchema::new(vec![
            workspace_name_field("Name of the workspace"),
            FieldDescriptor::optional("description", FieldType::String)
                .with_constraint(Constraint::MaxLength(4000))
                .with_description("Description of the workspace"),
        ]),
    )
}

/// Contract for `get_workspace_details`.
fn get_workspace_details() -> OperationContract {
    OperationContract::new(
        "get_workspace_details",
        MODULE,
        "Get detailed information about a specific workspace",
        ParameterSchema::new(vec![workspace_name_field("Name of the workspace")]),
    )
}

/// Contract for `delete_workspace`.
fn delete_workspace() -> OperationContract {
    OperationContract::new(
        "delete_workspace",
        MODULE,
        "Delete a workspace from the platform instance",
        ParameterSchema::new(vec![
            workspace_name_field("Name of the workspace to delete"),
            FieldDescriptor::optional("force", FieldType::Boolean)
                .with_default(json!(false))
                .with_description("Delete even when the workspace holds resources"),
        ]),
    )
}

/// Contract for `grant_workspace_access`.
fn grant_workspace_access() -> OperationContract {
    OperationContract::new(
        "grant_workspace_access",
        MODULE,
        "Grant a user access to a workspace",
        ParameterSchema::new(vec![
            workspace_name_field("Name of the workspace"),
            FieldDescriptor::required("user_id", FieldType::String)
                .with_constraint(Constraint::MinLength(1))
                .with_constraint(Constraint::MaxLength(512))
                .with_description("User identifier or username"),
            FieldDescriptor::required(
                "role",
                FieldType::Enum {
                    allowed: vec![
                        "viewer".to_string(),
                        "contributor".to_string(),
                        "admin".to_string(),
                    ],
                },
            )
            .with_description("Role to grant"),
        ]),
    )
}
