//! Attribute type system for catalog entities.
//!
//! Every entity attribute declares an [`AttributeType`]: either a single
//! scalar kind or an array of one scalar kind. Runtime values travel as
//! `serde_json::Value` and are checked against their declared type before a
//! write is accepted. Kind checks are driven by the [`KIND_SPECS`] table so
//! that adding a kind does not require touching every consumer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The scalar kinds an attribute value can take.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    /// True / false.
    Boolean,
    /// Free-form text.
    String,
    /// Whole number.
    Integer,
    /// Floating-point number.
    Decimal,
    /// Calendar date, `YYYY-MM-DD` string payload.
    Date,
    /// RFC 3339 timestamp string payload.
    DateTime,
    /// Time of day, `HH:MM:SS` string payload.
    Time,
    /// UUID string payload.
    Uuid,
    /// Nested JSON object.
    Object,
}

impl ScalarKind {
    /// Every scalar kind, in declaration order.
    pub const ALL: [ScalarKind; 9] = [
        ScalarKind::Boolean,
        ScalarKind::String,
        ScalarKind::Integer,
        ScalarKind::Decimal,
        ScalarKind::Date,
        ScalarKind::DateTime,
        ScalarKind::Time,
        ScalarKind::Uuid,
        ScalarKind::Object,
    ];

    /// Returns the spec table entry for this kind.
    pub fn spec(&self) -> &'static KindSpec {
        // KIND_SPECS covers every variant; verified by test_kind_specs_total.
        KIND_SPECS
            .iter()
            .find(|s| s.kind == *self)
            .unwrap_or(&KIND_SPECS[0])
    }

    /// Stable lowercase code for this kind.
    pub fn code(&self) -> &'static str {
        self.spec().code
    }

    /// Checks whether a runtime value satisfies this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        (self.spec().check)(value)
    }
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.spec().label)
    }
}

/// One row of the kind table: metadata plus the runtime check for a kind.
pub struct KindSpec {
    /// The kind this row describes.
    pub kind: ScalarKind,
    /// Stable lowercase code.
    pub code: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Runtime check for a candidate value.
    pub check: fn(&Value) -> bool,
}

fn is_boolean(v: &Value) -> bool {
    v.is_boolean()
}

fn is_string(v: &Value) -> bool {
    v.is_string()
}

fn is_integer(v: &Value) -> bool {
    v.as_i64().is_some() || v.as_u64().is_some()
}

fn is_decimal(v: &Value) -> bool {
    v.is_number()
}

fn is_date(v: &Value) -> bool {
    v.as_str()
        .map(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())
        .unwrap_or(false)
}

fn is_datetime(v: &Value) -> bool {
    v.as_str()
        .map(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok())
        .unwrap_or(false)
}

fn is_time(v: &Value) -> bool {
    v.as_str()
        .map(|s| chrono::NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok())
        .unwrap_or(false)
}

fn is_uuid(v: &Value) -> bool {
    v.as_str()
        .map(|s| uuid::Uuid::parse_str(s).is_ok())
        .unwrap_or(false)
}

fn is_object(v: &Value) -> bool {
    v.is_object()
}

/// The kind table. One entry per scalar kind.
pub static KIND_SPECS: [KindSpec; 9] = [
    KindSpec {
        kind: ScalarKind::Boolean,
        code: "boolean",
        label: "Boolean",
        check: is_boolean,
    },
    KindSpec {
        kind: ScalarKind::String,
        code: "string",
        label: "String",
        check: is_string,
    },
    KindSpec {
        kind: ScalarKind::Integer,
        code: "integer",
        label: "Integer",
        check: is_integer,
    },
    KindSpec {
        kind: ScalarKind::Decimal,
        code: "decimal",
        label: "Decimal",
        check: is_decimal,
    },
    KindSpec {
        kind: ScalarKind::Date,
        code: "date",
        label: "Date",
        check: is_date,
    },
    KindSpec {
        kind: ScalarKind::DateTime,
        code: "datetime",
        label: "Date-Time",
        check: is_datetime,
    },
    KindSpec {
        kind: ScalarKind::Time,
        code: "time",
        label: "Time",
        check: is_time,
    },
    KindSpec {
        kind: ScalarKind::Uuid,
        code: "uuid",
        label: "UUID",
        check: is_uuid,
    },
    KindSpec {
        kind: ScalarKind::Object,
        code: "object",
        label: "Object",
        check: is_object,
    },
];

/// The declared type of one entity attribute.
///
/// Arrays carry exactly one element kind; arrays of arrays are
/// unrepresentable by construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// A single scalar value.
    Scalar(ScalarKind),
    /// A homogeneous array of scalar values.
    Array(ScalarKind),
}

/// Errors from attribute type operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeTypeError {
    /// `element_kind` was called on a non-array type.
    #[error("{0} is not an array type")]
    NotAnArray(AttributeType),
    /// A runtime value did not satisfy its declared type.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// The declared type.
        expected: AttributeType,
        /// Short description of the offending value's shape.
        found: &'static str,
    },
}

impl AttributeType {
    /// Shorthand for a scalar type.
    pub fn scalar(kind: ScalarKind) -> Self {
        AttributeType::Scalar(kind)
    }

    /// Shorthand for an array type.
    pub fn array_of(kind: ScalarKind) -> Self {
        AttributeType::Array(kind)
    }

    /// True iff this is an array type.
    pub fn is_array(&self) -> bool {
        matches!(self, AttributeType::Array(_))
    }

    /// Returns the element kind of an array type.
    pub fn element_kind(&self) -> Result<ScalarKind, AttributeTypeError> {
        match self {
            AttributeType::Array(kind) => Ok(*kind),
            AttributeType::Scalar(_) => Err(AttributeTypeError::NotAnArray(*self)),
        }
    }

    /// Checks a runtime value against this type.
    ///
    /// Array values must be JSON arrays whose every element independently
    /// satisfies the element kind.
    pub fn validate(&self, value: &Value) -> Result<(), AttributeTypeError> {
        match self {
            AttributeType::Scalar(kind) => {
                if kind.accepts(value) {
                    Ok(())
                } else {
                    Err(AttributeTypeError::TypeMismatch {
                        expected: *self,
                        found: json_shape(value),
                    })
                }
            }
            AttributeType::Array(kind) => {
                let items = value
                    .as_array()
                    .ok_or(AttributeTypeError::TypeMismatch {
                        expected: *self,
                        found: json_shape(value),
                    })?;
                for item in items {
                    if !kind.accepts(item) {
                        return Err(AttributeTypeError::TypeMismatch {
                            expected: *self,
                            found: json_shape(item),
                        });
                    }
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeType::Scalar(kind) => write!(f, "{}", kind),
            AttributeType::Array(kind) => write!(f, "Array of {}", kind),
        }
    }
}

/// Short description of a JSON value's shape, for error messages.
pub fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
