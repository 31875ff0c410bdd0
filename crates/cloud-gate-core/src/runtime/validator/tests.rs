// cloud-gate-core/src/runtime/validator/tests.rs
// ============================================================================
// Module: Parameter Validator Tests
// Description: Unit tests for coercion, constraints, and strictness.
// Purpose: Verify validation ordering, determinism, and idempotence.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Exercises the validator against a bucket-creation style schema plus
//! targeted cases for each coercion and constraint path. Validation is pure,
//! so determinism and idempotence are asserted directly.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Tests use unwrap/expect/panic for brevity."
)]

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use super::validate;
use crate::core::failure::FailureKind;
use crate::core::schema::Constraint;
use crate::core::schema::FieldDescriptor;
use crate::core::schema::FieldType;
use crate::core::schema::ParameterSchema;

fn bucket_schema() -> ParameterSchema {
    ParameterSchema::new(vec![
        FieldDescriptor::required("bucket_name", FieldType::String)
            .with_constraint(Constraint::MinLength(1))
            .with_constraint(Constraint::MaxLength(256))
            .with_constraint(Constraint::Pattern(r"^[a-zA-Z0-9._-]+$".to_string())),
        FieldDescriptor::optional(
            "storage_tier",
            FieldType::Enum {
                allowed: vec!["Standard".to_string(), "Archive".to_string()],
            },
        )
        .with_default(json!("Standard")),
        FieldDescriptor::optional("limit", FieldType::integer())
            .with_constraint(Constraint::Min(1))
            .with_constraint(Constraint::Max(1000)),
    ])
}

fn raw(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs.iter().map(|(name, value)| ((*name).to_string(), value.clone())).collect()
}

#[test]
fn missing_required_field_is_first_failure() {
    let failure = validate(&bucket_schema(), &raw(&[])).unwrap_err();
    assert_eq!(
        failure.kind,
        FailureKind::MissingField {
            field: "bucket_name".to_string()
        }
    );
    assert!(!failure.retryable);
}

#[test]
fn empty_string_violates_min_length() {
    let failure = validate(&bucket_schema(), &raw(&[("bucket_name", json!(""))])).unwrap_err();
    assert_eq!(
        failure.kind,
        FailureKind::Constraint {
            field: "bucket_name".to_string(),
            constraint: "minLength".to_string(),
        }
    );
}

#[test]
fn constraints_apply_in_declaration_order() {
    // Violates maxLength and pattern; maxLength is declared first and wins.
    let long_name = format!("{}!", "a".repeat(300));
    let failure =
        validate(&bucket_schema(), &raw(&[("bucket_name", json!(long_name))])).unwrap_err();
    assert_eq!(
        failure.kind,
        FailureKind::Constraint {
            field: "bucket_name".to_string(),
            constraint: "maxLength".to_string(),
        }
    );
}

#[test]
fn pattern_violation_is_reported() {
    let failure =
        validate(&bucket_schema(), &raw(&[("bucket_name", json!("bad name"))])).unwrap_err();
    assert_eq!(
        failure.kind,
        FailureKind::Constraint {
            field: "bucket_name".to_string(),
            constraint: "pattern".to_string(),
        }
    );
}

#[test]
fn unknown_field_is_rejected_after_declared_fields() {
    let failure = validate(
        &bucket_schema(),
        &raw(&[("bucket_name", json!("logs")), ("bucketname", json!("typo"))]),
    )
    .unwrap_err();
    assert_eq!(
        failure.kind,
        FailureKind::UnknownField {
            field: "bucketname".to_string()
        }
    );
}

#[test]
fn valid_input_substitutes_defaults() {
    let typed = validate(&bucket_schema(), &raw(&[("bucket_name", json!("logs"))])).unwrap();
    assert_eq!(typed.str("bucket_name"), Some("logs"));
    assert_eq!(typed.str("storage_tier"), Some("Standard"));
    assert!(typed.get("limit").is_none());
}

#[test]
fn enum_rejects_unlisted_and_wrong_case_values() {
    let failure = validate(
        &bucket_schema(),
        &raw(&[("bucket_name", json!("logs")), ("storage_tier", json!("standard"))]),
    )
    .unwrap_err();
    assert_eq!(
        failure.kind,
        FailureKind::InvalidEnum {
            field: "storage_tier".to_string(),
            allowed: vec!["Standard".to_string(), "Archive".to_string()],
        }
    );
}

#[test]
fn enum_rejects_non_string_values_as_invalid_type() {
    let failure = validate(
        &bucket_schema(),
        &raw(&[("bucket_name", json!("logs")), ("storage_tier", json!(1))]),
    )
    .unwrap_err();
    assert!(matches!(failure.kind, FailureKind::InvalidType { .. }));
}

#[test]
fn integer_rejects_floats_and_numeric_strings_by_default() {
    let schema = ParameterSchema::new(vec![FieldDescriptor::required("limit", FieldType::integer())]);
    for value in [json!(1.5), json!("10"), json!(true)] {
        let failure = validate(&schema, &raw(&[("limit", value)])).unwrap_err();
        assert!(matches!(failure.kind, FailureKind::InvalidType { ref field, .. } if field == "limit"));
    }
    let typed = validate(&schema, &raw(&[("limit", json!(10))])).unwrap();
    assert_eq!(typed.integer("limit"), Some(10));
}

#[test]
fn integer_accepts_decimal_strings_when_opted_in() {
    let schema = ParameterSchema::new(vec![FieldDescriptor::required(
        "limit",
        FieldType::Integer {
            allow_string: true,
        },
    )]);
    let typed = validate(&schema, &raw(&[("limit", json!("42"))])).unwrap();
    assert_eq!(typed.integer("limit"), Some(42));
    let failure = validate(&schema, &raw(&[("limit", json!("4.2"))])).unwrap_err();
    assert!(matches!(failure.kind, FailureKind::InvalidType { .. }));
}

#[test]
fn boolean_accepts_only_json_booleans() {
    let schema = ParameterSchema::new(vec![FieldDescriptor::required("force", FieldType::Boolean)]);
    let typed = validate(&schema, &raw(&[("force", json!(true))])).unwrap();
    assert_eq!(typed.boolean("force"), Some(true));
    for value in [json!("true"), json!(1), json!(null)] {
        let failure = validate(&schema, &raw(&[("force", value)])).unwrap_err();
        assert!(matches!(failure.kind, FailureKind::InvalidType { .. }));
    }
}

#[test]
fn nested_object_failures_carry_dotted_paths() {
    let schema = ParameterSchema::new(vec![FieldDescriptor::required(
        "metadata",
        FieldType::Object {
            schema: Box::new(ParameterSchema::new(vec![FieldDescriptor::required(
                "owner",
                FieldType::String,
            )])),
        },
    )]);
    let failure = validate(&schema, &raw(&[("metadata", json!({}))])).unwrap_err();
    assert_eq!(
        failure.kind,
        FailureKind::MissingField {
            field: "metadata.owner".to_string()
        }
    );
    let failure =
        validate(&schema, &raw(&[("metadata", json!({"owner": "x", "extra": 1}))])).unwrap_err();
    assert_eq!(
        failure.kind,
        FailureKind::UnknownField {
            field: "metadata.extra".to_string()
        }
    );
}

#[test]
fn sequence_failures_carry_indexed_paths() {
    let schema = ParameterSchema::new(vec![
        FieldDescriptor::required(
            "tags",
            FieldType::Sequence {
                items: Box::new(FieldType::String),
            },
        )
        .with_constraint(Constraint::MinItems(1))
        .with_constraint(Constraint::MaxItems(3)),
    ]);
    let failure = validate(&schema, &raw(&[("tags", json!(["a", 2]))])).unwrap_err();
    assert!(matches!(failure.kind, FailureKind::InvalidType { ref field, .. } if field == "tags[1]"));
    let failure = validate(&schema, &raw(&[("tags", json!([]))])).unwrap_err();
    assert!(
        matches!(failure.kind, FailureKind::Constraint { ref constraint, .. } if constraint == "minItems")
    );
    let failure = validate(&schema, &raw(&[("tags", json!(["a", "b", "c", "d"]))])).unwrap_err();
    assert!(
        matches!(failure.kind, FailureKind::Constraint { ref constraint, .. } if constraint == "maxItems")
    );
}

#[test]
fn validation_is_deterministic() {
    let schema = bucket_schema();
    let input = raw(&[("bucket_name", json!("logs")), ("limit", json!(5))]);
    let first = validate(&schema, &input).unwrap();
    let second = validate(&schema, &input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn validation_is_idempotent() {
    let schema = bucket_schema();
    let input = raw(&[("bucket_name", json!("logs")), ("storage_tier", json!("Archive"))]);
    let once = validate(&schema, &input).unwrap();
    let Value::Object(revalidated_input) = once.clone().into_value() else {
        panic!("typed parameters serialize as an object");
    };
    let twice = validate(&schema, &revalidated_input).unwrap();
    assert_eq!(once, twice);
}
