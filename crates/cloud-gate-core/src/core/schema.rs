// cloud-gate-core/src/core/schema.rs
// ============================================================================
// Module: Parameter Schemas
// Description: Declarative field descriptors for operation parameters.
// Purpose: Drive the generic validator from static per-operation data.
// Dependencies: regex, serde, serde_json
// ============================================================================

//! ## Overview
//! Every registered operation carries a [`ParameterSchema`]: an ordered list of
//! field descriptors with type, required flag, default, and constraints. The
//! schema is pure data; a single generic validator interprets it, replacing
//! per-operation validation code. Schemas are checked once at registration
//! time so a malformed catalog fails at startup rather than on first call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Schema Types
// ============================================================================

/// Ordered parameter schema for one operation.
///
/// # Invariants
/// - Field names are unique within the schema (enforced by [`ParameterSchema::check`]).
/// - Field order is declaration order and is preserved through validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Field descriptors in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl ParameterSchema {
    /// Creates a schema from field descriptors.
    #[must_use]
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
        }
    }

    /// Creates an empty schema for operations without parameters.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Checks structural validity: unique field names, compilable patterns,
    /// non-empty enum literal sets, and well-formed nested schemas.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the schema is malformed.
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    field: field.name.clone(),
                });
            }
            field.check()?;
        }
        Ok(())
    }
}

/// One parameter field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as it appears in raw parameters.
    pub name: String,
    /// Declared field type.
    pub field_type: FieldType,
    /// Whether the field must be present in raw parameters.
    pub required: bool,
    /// Default substituted when the field is absent and not required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Constraints applied in declaration order after coercion.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Human-readable field description for tool listings.
    #[serde(default)]
    pub description: String,
}

impl FieldDescriptor {
    /// Creates a required field with no default or constraints.
    #[must_use]
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            default: None,
            constraints: Vec::new(),
            description: String::new(),
        }
    }

    /// Creates an optional field with no default or constraints.
    #[must_use]
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            default: None,
            constraints: Vec::new(),
            description: String::new(),
        }
    }

    /// Sets the default value substituted when the field is absent.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Appends a constraint, preserving declaration order.
    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Checks field-level structural validity.
    fn check(&self) -> Result<(), SchemaError> {
        self.field_type.check(&self.name)?;
        for constraint in &self.constraints {
            if let Constraint::Pattern(pattern) = constraint {
                Regex::new(pattern).map_err(|err| SchemaError::InvalidPattern {
                    field: self.name.clone(),
                    reason: err.to_string(),
                })?;
            }
        }
        Ok(())
    }
}

/// Declared parameter field types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    /// UTF-8 string value.
    String,
    /// Signed 64-bit integer. Numeric strings are rejected unless
    /// `allow_string` opts in; coercion is never silent.
    Integer {
        /// Accept decimal string representations of integers.
        #[serde(default)]
        allow_string: bool,
    },
    /// Boolean value; only JSON booleans are accepted.
    Boolean,
    /// Enumerated string set; values must match a literal exactly
    /// (case-sensitive).
    Enum {
        /// Allowed literal values.
        allowed: Vec<String>,
    },
    /// Nested object validated against its own schema.
    Object {
        /// Schema for the nested object's fields.
        schema: Box<ParameterSchema>,
    },
    /// Ordered sequence with homogeneous item type.
    Sequence {
        /// Item type applied to every element.
        items: Box<FieldType>,
    },
}

impl FieldType {
    /// Creates a strict integer type (no string coercion).
    #[must_use]
    pub const fn integer() -> Self {
        Self::Integer {
            allow_string: false,
        }
    }

    /// Returns a short label for error messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer {
                ..
            } => "integer",
            Self::Boolean => "boolean",
            Self::Enum {
                ..
            } => "enum",
            Self::Object {
                ..
            } => "object",
            Self::Sequence {
                ..
            } => "sequence",
        }
    }

    /// Checks type-level structural validity.
    fn check(&self, field: &str) -> Result<(), SchemaError> {
        match self {
            Self::Enum {
                allowed,
            } => {
                if allowed.is_empty() {
                    return Err(SchemaError::EmptyEnum {
                        field: field.to_string(),
                    });
                }
                Ok(())
            }
            Self::Object {
                schema,
            } => schema.check(),
            Self::Sequence {
                items,
            } => items.check(field),
            _ => Ok(()),
        }
    }
}

/// Field-level constraints applied after coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "constraint", rename_all = "camelCase")]
pub enum Constraint {
    /// Minimum string length in characters.
    MinLength(usize),
    /// Maximum string length in characters.
    MaxLength(usize),
    /// Regular expression the full string value must match.
    Pattern(String),
    /// Minimum numeric value (inclusive).
    Min(i64),
    /// Maximum numeric value (inclusive).
    Max(i64),
    /// Minimum sequence length.
    MinItems(usize),
    /// Maximum sequence length.
    MaxItems(usize),
}

impl Constraint {
    /// Returns the stable constraint label used in failure payloads.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MinLength(_) => "minLength",
            Self::MaxLength(_) => "maxLength",
            Self::Pattern(_) => "pattern",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
            Self::MinItems(_) => "minItems",
            Self::MaxItems(_) => "maxItems",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Structural schema errors surfaced at registration time.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two fields share the same name within one schema.
    #[error("duplicate field in schema: {field}")]
    DuplicateField {
        /// Offending field name.
        field: String,
    },
    /// A pattern constraint failed to compile.
    #[error("invalid pattern for field {field}: {reason}")]
    InvalidPattern {
        /// Field carrying the pattern.
        field: String,
        /// Compiler error text.
        reason: String,
    },
    /// An enum field declared no allowed literals.
    #[error("enum field {field} must declare at least one literal")]
    EmptyEnum {
        /// Offending field name.
        field: String,
    },
}
