//! Runtime type matching.

use serde_json::Value;

use crate::config::SchemaOptions;
use crate::model::{ScalarKind, TypeDescriptor};
use crate::validator::validate_rules;

/// Name reported for a value that is not present at all.
pub const UNDEFINED: &str = "undefined";

/// Runtime kind of a value, as reported in violation messages.
pub fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => UNDEFINED,
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Name of the kind a descriptor expects.
pub fn expected_name(descriptor: &TypeDescriptor) -> &'static str {
    match descriptor {
        TypeDescriptor::Scalar(kind) => kind.name(),
        TypeDescriptor::ArrayOf(_) => "array",
        TypeDescriptor::NestedSchema(_) => "object",
    }
}

/// Whether `value` satisfies `descriptor`. `null` never matches.
///
/// Nested schemas are checked with the same options as the enclosing schema.
pub fn matches(value: &Value, descriptor: &TypeDescriptor, options: SchemaOptions) -> bool {
    match descriptor {
        TypeDescriptor::Scalar(kind) => matches_scalar(value, *kind),
        TypeDescriptor::ArrayOf(inner) => match value {
            Value::Array(items) => items.iter().all(|item| matches(item, inner, options)),
            _ => false,
        },
        TypeDescriptor::NestedSchema(rules) => {
            value.is_object() && validate_rules(rules, options, value).valid
        }
    }
}

fn matches_scalar(value: &Value, kind: ScalarKind) -> bool {
    match (kind, value) {
        (ScalarKind::String, Value::String(_)) => true,
        (ScalarKind::Number, Value::Number(_)) => true,
        (ScalarKind::Boolean, Value::Bool(_)) => true,
        (ScalarKind::Object, Value::Object(_)) => true,
        (ScalarKind::Date, Value::String(text)) => is_timestamp(text),
        // JSON has no callable values.
        (ScalarKind::Function, _) => false,
        _ => false,
    }
}

fn is_timestamp(text: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(text).is_ok()
}
