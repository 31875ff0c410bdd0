// cloud-gate-contract/src/storage.rs
// ============================================================================
// Module: Object Storage Contracts
// Description: Operation contracts for the object storage module.
// Purpose: Declare bucket and object operations with their schemas.
// Dependencies: cloud-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Contracts for the `storage` module. Bucket names are constrained to 1-256
//! characters drawn from letters, digits, period, underscore, and hyphen,
//! without leading, trailing, or consecutive periods. Presigned URL expiry is
//! bounded to one week.

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

/// Module tag for object storage operations.
pub const MODULE: &str = "storage";
/// Bucket name pattern: allowed characters, no edge or doubled periods.
const BUCKET_NAME_PATTERN: &str = r"^[a-zA-Z0-9_-]+(\.[a-zA-Z0-9_-]+)*$";
/// Maximum presigned URL lifetime in seconds (one week).
const MAX_PRESIGN_EXPIRY_SECONDS: i64 = 604_800;

// ============================================================================
// SECTION: Contracts
// ============================================================================

/// Returns the object storage contracts in listing order.
#[must_use]
pub fn contracts() -> Vec<OperationContract> {
    vec![
        list_buckets(),
        create_bucket(),
        get_bucket_details(),
        update_bucket(),
        delete_bucket(),
        list_objects(),
        get_object_metadata(),
        delete_object(),
        copy_object(),
        create_presigned_url(),
    ]
}

/// Field declaring a bucket name with the full constraint chain.
fn bucket_name_field(description: &str) -> FieldDescriptor {
    FieldDescriptor::required("bucket_name", FieldType::String)
        .with_constraint(Constraint::MinLength(1))
        .with_constraint(Constraint::MaxLength(256))
        .with_constraint(Constraint::Pattern(BUCKET_NAME_PATTERN.to_string()))
        .with_description(description)
}

/// Field declaring an object name within a bucket.
fn object_name_field(name: &str, description: &str) -> FieldDescriptor {
    FieldDescriptor::required(name, FieldType::String)
        .with_constraint(Constraint::MinLength(1))
        .with_constraint(Constraint::MaxLength(1024))
        .with_description(description)
}

/// Contract for `list_buckets`.
fn list_buckets() -> OperationContract {
    OperationContract::new(
        "list_buckets",
        MODULE,
        "List all object storage buckets in the compartment",
        ParameterSchema::new(vec![
            FieldDescriptor::optional("limit", FieldType::integer())
                .with_default(json!(100))
                .with_constraint(Constraint::Min(1))
                .with_constraint(Constraint::Max(1000))
                .with_description("Maximum number of buckets to return"),
        ]),
    )
}

/// Contract for `create_bucket`.
fn create_bucket() -> OperationContract {
    OperationContract::new(
        "create_bucket",
        MODULE,
        "Create a new object storage bucket",
        ParameterSchema::new(vec![
            bucket_name_field("Name of the bucket"),
            FieldDescriptor::optional(
                "storage_tier",
                FieldType::Enum {
                    allowed: vec!["Standard".to_string(), "Archive".to_string()],
                },
            )
            .with_default(json!("Standard"))
            .with_description("Storage tier"),
            FieldDescriptor::optional("public_access", FieldType::Boolean)
                .with_default(json!(false))
                .with_description("Enable public access"),
        ]),
    )
}

/// Contract for `get_bucket_details`.
fn get_bucket_details() -> OperationContract {
    OperationContract::new(
        "get_bucket_details",
        MODULE,
        "Get detailed information about a bucket",
        ParameterSchema::new(vec![bucket_name_field("Name of the bucket")]),
    )
}

/// Contract for `update_bucket`.
fn update_bucket() -> OperationContract {
    OperationContract::new(
        "update_bucket",
        MODULE,
        "Update bucket settings and metadata",
        ParameterSchema::new(vec![
            bucket_name_field("Name of the bucket"),
            FieldDescriptor::optional("public_access", FieldType::Boolean)
                .with_description("Enable or disable public access"),
        ]),
    )
}

/// Contract for `delete_bucket`.
fn delete_bucket() -> OperationContract {
    OperationContract::new(
        "delete_bucket",
        MODULE,
        "Delete an object storage bucket",
        ParameterSchema::new(vec![
            bucket_name_field("Name of the bucket to delete"),
            FieldDescriptor::optional("force", FieldType::Boolean)
                .with_default(json!(false))
                .with_description("Delete contained objects first"),
        ]),
    )
}

/// Contract for `list_objects`.
fn list_objects() -> OperationContract {
    OperationContract::new(
        "list_objects",
        MODULE,
        "List objects in a bucket with an optional prefix filter",
        ParameterSchema::new(vec![
            bucket_name_field("Name of the bucket"),
            FieldDescriptor::optional("prefix", FieldType::String)
                .with_constraint(Constraint::MaxLength(1024))
                .with_description("Prefix to filter objects"),
            FieldDescriptor::optional("limit", FieldType::integer())
                .with_default(json!(100))
                .with_constraint(Constraint::Min(1))
                .with_constraint(Constraint::Max(1000))
                .with_description("Maximum number of objects to return"),
        ]),
    )
}

/// Contract for `get_object_metadata`.
fn get_object_metadata() -> OperationContract {
    OperationContract::new(
        "get_object_metadata",
        MODULE,
        "Get metadata for an object without downloading it",
        ParameterSchema::new(vec![
            bucket_name_field("Name of the bucket"),
            object_name_field("object_name", "Name of the object"),
        ]),
    )
}

/// Contract for `delete_object`.
fn delete_object() -> OperationContract {
    OperationContract::new(
        "delete_object",
        MODULE,
        "Delete an object from a bucket",
        ParameterSchema::new(vec![
            bucket_name_field("Name of the bucket"),
            object_name_field("object_name", "Name of the object to delete"),
        ]),
    )
}

/// Contract for `copy_object`.
fn copy_object() -> OperationContract {
    OperationContract::new(
        "copy_object",
        MODULE,
        "Copy an object to another bucket or name",
        ParameterSchema::new(vec![
            bucket_name_field("Source bucket name"),
            object_name_field("object_name", "Source object name"),
            FieldDescriptor::required("destination_bucket", FieldType::String)
                .with_constraint(Constraint::MinLength(1))
                .with_constraint(Constraint::MaxLength(256))
                .with_constraint(Constraint::Pattern(BUCKET_NAME_PATTERN.to_string()))
                .with_description("Destination bucket name"),
            object_name_field("destination_name", "Destination object name"),
        ]),
    )
}

/// Contract for `create_presigned_url`.
fn create_presigned_url() -> OperationContract {
    OperationContract::new(
        "create_presigned_url",
        MODULE,
        "Create a time-limited access URL for an object",
        ParameterSchema::new(vec![
            bucket_name_field("Name of the bucket"),
            object_name_field("object_name", "Name of the object"),
            FieldDescriptor::optional(
                "access_type",
                FieldType::Enum {
                    allowed: vec!["ObjectRead".to_string(), "ObjectWrite".to_string()],
                },
            )
            .with_default(json!("ObjectRead"))
            .with_description("Access granted by the URL"),
            FieldDescriptor::optional("expires_in_seconds", FieldType::integer())
                .with_default(json!(3600))
                .with_constraint(Constraint::Min(1))
                .with_constraint(Constraint::Max(MAX_PRESIGN_EXPIRY_SECONDS))
                .with_description("URL lifetime in seconds"),
        ]),
    )
}
