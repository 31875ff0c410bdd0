// cloud-gate-contract/src/compute.rs
// ============================================================================
// Module: Compute Cluster Contracts
// Description: Operation contracts for the compute cluster module.
// Purpose: Declare cluster and pool operations with their schemas.
// Dependencies: cloud-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Contracts for the `compute` module: Spark cluster lifecycle and resource
//! pool control. Cluster and pool identifiers are opaque resource IDs
//! validated by length only; the backend owns their exact format.

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

/// Module tag for compute operations.
pub const MODULE: &str = "compute";
/// Maximum executors in one cluster.
const MAX_EXECUTORS: i64 = 512;
/// Maximum nodes in one resource pool.
const MAX_POOL_NODES: i64 = 1024;

// ============================================================================
// SECTION: Contracts
// ============================================================================

/// Returns the compute contracts in listing order.
#[must_use]
pub fn contracts() -> Vec<OperationContract> {
    vec![
        list_clusters(),
        get_cluster_details(),
        create_cluster(),
        delete_cluster(),
        list_pools(),
        start_pool(),
        stop_pool(),
    ]
}

/// Field declaring an opaque resource identifier.
fn resource_id_field(name: &str, description: &str) -> FieldDescriptor {
    FieldDescriptor::required(name, FieldType::String)
        .with_constraint(Constraint::MinLength(1))
        .with_constraint(Constraint::MaxLength(512))
        .with_description(description)
}

/// Contract for `list_clusters`.
fn list_clusters() -> OperationContract {
    OperationContract::new(
        "list_clusters",
        MODULE,
        "List all compute clusters",
        ParameterSchema::new(vec![
            FieldDescriptor::optional("limit", FieldType::integer())
                .with_default(json!(100))
                .with_constraint(Constraint::Min(1))
                .with_constraint(Constraint::Max(1000))
                .with_description("Maximum number of clusters to return"),
        ]),
    )
}

/// Contract for `get_cluster_details`.
fn get_cluster_details() -> OperationContract {
    OperationContract::new(
        "get_cluster_details",
        MODULE,
        "Get detailed information about a specific cluster",
        ParameterSchema::new(vec![resource_id_field("cluster_id", "Cluster identifier")]),
    )
}

/// Contract for `create_cluster`.
fn create_cluster() -> OperationContract {
    OperationContract::new(
        "create_cluster",
        MODULE,
        "Create a new compute cluster",
        ParameterSchema::new(vec![
            FieldDescriptor::required("cluster_name", FieldType::String)
                .with_constraint(Constraint::MinLength(1))
                .with_constraint(Constraint::MaxLength(255))
                .with_description("Name for the cluster"),
            FieldDescriptor::optional("driver_shape", FieldType::String)
                .with_default(json!("VM.Standard2.1"))
                .with_description("Driver node shape"),
            FieldDescriptor::optional("executor_shape", FieldType::String)
                .with_default(json!("VM.Standard2.1"))
                .with_description("Executor node shape"),
            FieldDescriptor::optional("num_executors", FieldType::integer())
                .with_default(json!(2))
                .with_constraint(Constraint::Min(1))
                .with_constraint(Constraint::Max(MAX_EXECUTORS))
                .with_description("Number of executor nodes"),
        ]),
    )
}

/// Contract for `delete_cluster`.
fn delete_cluster() -> OperationContract {
    OperationContract::new(
        "delete_cluster",
        MODULE,
        "Delete a compute cluster",
        ParameterSchema::new(vec![resource_id_field("cluster_id", "Cluster identifier to delete")]),
    )
}

/// Contract for `list_pools`.
fn list_pools() -> OperationContract {
    OperationContract::new(
        "list_pools",
        MODULE,
        "List all resource pools",
        ParameterSchema::new(vec![
            FieldDescriptor::optional("limit", FieldType::integer())
                .with_default(json!(100))
                .with_constraint(Constraint::Min(1))
                .with_constraint(Constraint::Max(1000))
                .with_description("Maximum number of pools to return"),
            FieldDescriptor::optional("node_count", FieldType::integer())
                .with_constraint(Constraint::Min(1))
                .with_constraint(Constraint::Max(MAX_POOL_NODES))
                .with_description("Filter pools by node count"),
        ]),
    )
}

/// Contract for `start_pool`.
fn start_pool() -> OperationContract {
    OperationContract::new(
        "start_pool",
        MODULE,
        "Start a stopped resource pool",
        ParameterSchema::new(vec![resource_id_field("pool_id", "Pool identifier")]),
    )
}

/// Contract for `stop_pool`.
fn stop_pool() -> OperationContract {
    OperationContract::new(
        "stop_pool",
        MODULE,
        "Stop a running resource pool",
        ParameterSchema::new(vec![resource_id_field("pool_id", "Pool identifier")]),
    )
}
