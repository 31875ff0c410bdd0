// cloud-gate-core/src/runtime/validator.rs
// ============================================================================
// Module: Parameter Validator
// Description: Schema-driven validation and coercion of raw parameters.
// Purpose: Produce typed parameters or the first classified validation failure.
// Dependencies: crate::core, regex, serde_json
// ============================================================================

//! ## Overview
//! One generic validator interprets every operation's [`ParameterSchema`].
//! Fields are processed in declaration order: presence, default substitution,
//! strict type coercion, then constraints in their declared order. The first
//! violation short-circuits. Unknown fields are rejected last. Validation is
//! pure: same schema and raw parameters always produce the same outcome, and
//! validating a validator's output yields the identical result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use serde_json::Map;
use serde_json::Value;

use crate::core::failure::Failure;
use crate::core::params::TypedParameters;
use crate::core::schema::Constraint;
use crate::core::schema::FieldDescriptor;
use crate::core::schema::FieldType;
use crate::core::schema::ParameterSchema;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Validates raw parameters against a schema.
///
/// # Errors
///
/// Returns the first [`Failure`] encountered: `missing_field`, `invalid_type`,
/// `invalid_enum`, `constraint`, or `unknown_field`.
pub fn validate(
    schema: &ParameterSchema,
    raw: &Map<String, Value>,
) -> Result<TypedParameters, Failure> {
    let mut typed = TypedParameters::new();
    for field in &schema.fields {
        match raw.get(&field.name) {
            Some(value) => {
                let coerced = coerce_field(field, &field.name, value)?;
                typed.insert(field.name.clone(), coerced);
            }
            None if field.required => {
                return Err(Failure::missing_field(&field.name));
            }
            None => {
                // Defaults run through the same coercion and constraint path
                // as caller-supplied values.
                if let Some(default) = &field.default {
                    let coerced = coerce_field(field, &field.name, default)?;
                    typed.insert(field.name.clone(), coerced);
                }
            }
        }
    }
    for name in raw.keys() {
        if !schema.fields.iter().any(|field| field.name == *name) {
            return Err(Failure::unknown_field(name));
        }
    }
    Ok(typed)
}

// ============================================================================
// SECTION: Field Coercion
// ============================================================================

/// Coerces one field value and applies its constraints in declaration order.
fn coerce_field(field: &FieldDescriptor, path: &str, value: &Value) -> Result<Value, Failure> {
    let coerced = coerce_type(&field.field_type, path, value)?;
    for constraint in &field.constraints {
        check_constraint(constraint, path, &coerced)?;
    }
    Ok(coerced)
}

/// Coerces a raw value to the declared type. Coercion is strict: only the
/// opt-in integer-from-string conversion is permitted.
fn coerce_type(field_type: &FieldType, path: &str, value: &Value) -> Result<Value, Failure> {
    match field_type {
        FieldType::String => match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(Failure::invalid_type(path, field_type.label())),
        },
        FieldType::Integer {
            allow_string,
        } => coerce_integer(path, value, *allow_string),
        FieldType::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            _ => Err(Failure::invalid_type(path, field_type.label())),
        },
        FieldType::Enum {
            allowed,
        } => match value {
            Value::String(candidate) => {
                if allowed.iter().any(|literal| literal == candidate) {
                    Ok(value.clone())
                } else {
                    Err(Failure::invalid_enum(path, allowed.clone()))
                }
            }
            _ => Err(Failure::invalid_type(path, field_type.label())),
        },
        FieldType::Object {
            schema,
        } => match value {
            Value::Object(nested) => {
                let typed = validate_nested(schema, nested, path)?;
                Ok(typed.into_value())
            }
            _ => Err(Failure::invalid_type(path, field_type.label())),
        },
        FieldType::Sequence {
            items,
        } => match value {
            Value::Array(elements) => {
                let mut coerced = Vec::with_capacity(elements.len());
                for (index, element) in elements.iter().enumerate() {
                    let item_path = format!("{path}[{index}]");
                    coerced.push(coerce_type(items, &item_path, element)?);
                }
                Ok(Value::Array(coerced))
            }
            _ => Err(Failure::invalid_type(path, field_type.label())),
        },
    }
}

/// Coerces an integer field. JSON numbers must be integral; decimal strings
/// are accepted only when the field opts in.
fn coerce_integer(path: &str, value: &Value, allow_string: bool) -> Result<Value, Failure> {
    match value {
        Value::Number(number) => {
            number.as_i64().map(Value::from).ok_or_else(|| Failure::invalid_type(path, "integer"))
        }
        Value::String(text) if allow_string => text
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| Failure::invalid_type(path, "integer")),
        _ => Err(Failure::invalid_type(path, "integer")),
    }
}

/// Validates a nested object, prefixing failure paths with the parent field.
fn validate_nested(
    schema: &ParameterSchema,
    nested: &Map<String, Value>,
    parent: &str,
) -> Result<TypedParameters, Failure> {
    let mut typed = TypedParameters::new();
    for field in &schema.fields {
        let path = format!("{parent}.{}", field.name);
        match nested.get(&field.name) {
            Some(value) => {
                let coerced = coerce_field(field, &path, value)?;
                typed.insert(field.name.clone(), coerced);
            }
            None if field.required => {
                return Err(Failure::missing_field(path));
            }
            None => {
                if let Some(default) = &field.default {
                    let coerced = coerce_field(field, &path, default)?;
                    typed.insert(field.name.clone(), coerced);
                }
            }
        }
    }
    for name in nested.keys() {
        if !schema.fields.iter().any(|field| field.name == *name) {
            return Err(Failure::unknown_field(format!("{parent}.{name}")));
        }
    }
    Ok(typed)
}

// ============================================================================
// SECTION: Constraints
// ============================================================================

/// Applies one constraint to a coerced value.
///
/// Constraints only fire on values of their kind: a length constraint on an
/// integer field is inert rather than an error, since the schema check at
/// registration is the place to catch declaration mistakes.
fn check_constraint(constraint: &Constraint, path: &str, value: &Value) -> Result<(), Failure> {
    let violated = match (constraint, value) {
        (Constraint::MinLength(min), Value::String(text)) => text.chars().count() < *min,
        (Constraint::MaxLength(max), Value::String(text)) => text.chars().count() > *max,
        (Constraint::Pattern(pattern), Value::String(text)) => {
            // Schema check compiled this pattern at registration; a failure
            // here means the schema was never checked, treated as mismatch.
            Regex::new(pattern).map_or(true, |regex| !regex.is_match(text))
        }
        (Constraint::Min(min), Value::Number(number)) => {
            number.as_i64().is_none_or(|candidate| candidate < *min)
        }
        (Constraint::Max(max), Value::Number(number)) => {
            number.as_i64().is_none_or(|candidate| candidate > *max)
        }
        (Constraint::MinItems(min), Value::Array(items)) => items.len() < *min,
        (Constraint::MaxItems(max), Value::Array(items)) => items.len() > *max,
        _ => false,
    };
    if violated {
        return Err(Failure::constraint(path, constraint.label()));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
