use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::SchemaOptions;
use crate::matcher::{expected_name, matches, type_name};
use crate::model::{join_path, RuleSet, TypeDescriptor};

/// A single finding produced by a validation run.
///
/// `Display` renders the stable message format consumers parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Input key not declared by a strict schema.
    NotInSchema { property: String },
    /// Required property absent or null.
    Required { property: String },
    /// Value of the wrong runtime kind.
    WrongType {
        property: String,
        actual: &'static str,
        expected: &'static str,
    },
    /// Array value with at least one element of the wrong kind.
    InvalidArrayItem {
        property: String,
        expected: &'static str,
    },
}

impl Violation {
    /// Dotted path of the offending property.
    pub fn property(&self) -> &str {
        match self {
            Self::NotInSchema { property }
            | Self::Required { property }
            | Self::WrongType { property, .. }
            | Self::InvalidArrayItem { property, .. } => property,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInSchema { property } => write!(f, "Property {property} not valid in schema"),
            Self::Required { property } => write!(f, "Property {property} is required"),
            Self::WrongType {
                property,
                actual,
                expected,
            } => write!(f, "Property {property} is {actual}, expected {expected}"),
            Self::InvalidArrayItem { property, expected } => write!(
                f,
                "An item in array of property {property} is not valid. All items must be of type {expected}"
            ),
        }
    }
}

/// Outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// True iff `violations` is empty.
    pub valid: bool,
    pub violations: Vec<Violation>,
    /// Matched declared properties only; undeclared keys are never echoed.
    pub sanitized_body: Map<String, Value>,
}

impl ValidationResult {
    /// Violations rendered as messages, in report order.
    pub fn errors(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// Validate `input` against `rules`.
///
/// Extra-key violations (strict mode, input order) come first, then property
/// violations in rule definition order. A non-object input has no keys, so
/// every rule sees its property as absent. Never fails.
pub fn validate_rules(rules: &RuleSet, options: SchemaOptions, input: &Value) -> ValidationResult {
    let mut violations = Vec::new();
    let sanitized_body = check_object(rules, options, input, None, &mut violations);

    ValidationResult {
        valid: violations.is_empty(),
        violations,
        sanitized_body,
    }
}

fn check_object(
    rules: &RuleSet,
    options: SchemaOptions,
    input: &Value,
    parent: Option<&str>,
    violations: &mut Vec<Violation>,
) -> Map<String, Value> {
    let object = input.as_object();

    if options.strict {
        if let Some(object) = object {
            violations.extend(
                object
                    .keys()
                    .filter(|key| !rules.contains(key))
                    .map(|key| Violation::NotInSchema {
                        property: join_path(parent, key),
                    }),
            );
        }
    }

    let mut body = Map::new();
    for (name, rule) in rules.iter() {
        let property = join_path(parent, name);
        let value = object
            .and_then(|object| object.get(name))
            .filter(|value| !value.is_null());

        let Some(value) = value else {
            if rule.required {
                violations.push(Violation::Required { property });
            }
            continue;
        };

        match &rule.descriptor {
            TypeDescriptor::ArrayOf(inner) => match value {
                Value::Array(items) if items.iter().all(|item| matches(item, inner, options)) => {
                    body.insert(name.to_string(), sanitize(value, &rule.descriptor));
                }
                Value::Array(_) => violations.push(Violation::InvalidArrayItem {
                    property,
                    expected: expected_name(inner),
                }),
                other => violations.push(Violation::WrongType {
                    property,
                    actual: type_name(Some(other)),
                    expected: "array",
                }),
            },
            TypeDescriptor::NestedSchema(nested) if value.is_object() => {
                let before = violations.len();
                let nested_body =
                    check_object(nested, options, value, Some(property.as_str()), violations);
                if violations.len() == before {
                    body.insert(name.to_string(), Value::Object(nested_body));
                }
            }
            descriptor => {
                if matches(value, descriptor, options) {
                    body.insert(name.to_string(), value.clone());
                } else {
                    violations.push(Violation::WrongType {
                        property,
                        actual: type_name(Some(value)),
                        expected: expected_name(descriptor),
                    });
                }
            }
        }
    }

    body
}

/// Copy of an already-matched value with undeclared nested keys removed.
fn sanitize(value: &Value, descriptor: &TypeDescriptor) -> Value {
    match (descriptor, value) {
        (TypeDescriptor::ArrayOf(inner), Value::Array(items)) => {
            Value::Array(items.iter().map(|item| sanitize(item, inner)).collect())
        }
        (TypeDescriptor::NestedSchema(rules), Value::Object(object)) => {
            let mut body = Map::new();
            for (name, rule) in rules.iter() {
                if let Some(field) = object.get(name).filter(|field| !field.is_null()) {
                    body.insert(name.to_string(), sanitize(field, &rule.descriptor));
                }
            }
            Value::Object(body)
        }
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::PropertyRule;

    const STRICT: SchemaOptions = SchemaOptions { strict: true };
    const LAX: SchemaOptions = SchemaOptions { strict: false };

    fn reference_rules() -> RuleSet {
        RuleSet::new()
            .with("title", TypeDescriptor::string())
            .with("age", TypeDescriptor::number())
            .with("types", TypeDescriptor::array_of(TypeDescriptor::string()))
    }

    #[test]
    fn reports_every_violation_in_contract_order() {
        let input = json!({
            "title": 1,
            "age": "21",
            "types": [1],
            "something": true
        });

        let result = validate_rules(&reference_rules(), STRICT, &input);

        assert!(!result.valid);
        assert_eq!(
            result.errors(),
            vec![
                "Property something not valid in schema",
                "Property title is number, expected string",
                "Property age is string, expected number",
                "An item in array of property types is not valid. All items must be of type string",
            ]
        );
        assert!(result.sanitized_body.is_empty());
    }

    #[test]
    fn extra_keys_precede_property_errors_regardless_of_input_order() {
        let input = json!({ "zzz": 1, "age": "x", "aaa": 2 });
        let result = validate_rules(&reference_rules(), STRICT, &input);

        assert_eq!(
            result.errors(),
            vec![
                "Property zzz not valid in schema",
                "Property aaa not valid in schema",
                "Property age is string, expected number",
            ]
        );
    }

    #[test]
    fn property_errors_follow_rule_order_not_input_order() {
        let input = json!({ "types": "x", "age": "x", "title": 1 });
        let result = validate_rules(&reference_rules(), STRICT, &input);

        let properties: Vec<_> = result.violations.iter().map(Violation::property).collect();
        assert_eq!(properties, vec!["title", "age", "types"]);
        assert_eq!(result.errors()[2], "Property types is string, expected array");
    }

    #[test]
    fn missing_required_skips_type_check() {
        let rules = RuleSet::new()
            .with("name", PropertyRule::new(TypeDescriptor::string()).required())
            .with("nick", TypeDescriptor::string());

        let result = validate_rules(&rules, STRICT, &json!({ "name": null }));
        assert_eq!(result.errors(), vec!["Property name is required"]);

        let result = validate_rules(&rules, STRICT, &json!({ "name": "n", "nick": null }));
        assert!(result.valid);
        assert_eq!(result.sanitized_body, json!({ "name": "n" }).as_object().cloned().unwrap());
    }

    #[test]
    fn lax_mode_ignores_extra_keys_but_body_drops_them() {
        let rules = RuleSet::new().with("title", TypeDescriptor::string());
        let result = validate_rules(&rules, LAX, &json!({ "title": "something", "age": 21 }));

        assert!(result.valid);
        assert_eq!(Value::Object(result.sanitized_body), json!({ "title": "something" }));
    }

    #[test]
    fn body_holds_only_matching_properties() {
        let input = json!({ "title": "ok", "age": "nope", "types": ["a"] });
        let result = validate_rules(&reference_rules(), STRICT, &input);

        assert!(!result.valid);
        assert_eq!(
            Value::Object(result.sanitized_body),
            json!({ "title": "ok", "types": ["a"] })
        );
    }

    #[test]
    fn nested_violations_are_prefixed_and_in_place() {
        let rules = RuleSet::new()
            .with("name", PropertyRule::new(TypeDescriptor::string()).required())
            .with(
                "address",
                TypeDescriptor::nested(
                    RuleSet::new()
                        .with("city", PropertyRule::new(TypeDescriptor::string()).required())
                        .with("zip", TypeDescriptor::number()),
                ),
            )
            .with("age", TypeDescriptor::number());

        let input = json!({
            "age": "old",
            "address": { "zip": "0150", "country": "NO" }
        });
        let result = validate_rules(&rules, STRICT, &input);

        assert_eq!(
            result.errors(),
            vec![
                "Property name is required",
                "Property address.country not valid in schema",
                "Property address.city is required",
                "Property address.zip is string, expected number",
                "Property age is string, expected number",
            ]
        );
    }

    #[test]
    fn nested_non_object_is_a_type_error() {
        let rules = RuleSet::new().with("address", TypeDescriptor::nested(RuleSet::new()));
        let result = validate_rules(&rules, STRICT, &json!({ "address": [1] }));
        assert_eq!(result.errors(), vec!["Property address is array, expected object"]);
    }

    #[test]
    fn nested_body_is_sanitized_at_every_depth() {
        let point = RuleSet::new().with("x", TypeDescriptor::number());
        let rules = RuleSet::new()
            .with("origin", TypeDescriptor::nested(point.clone()))
            .with("path", TypeDescriptor::array_of(TypeDescriptor::nested(point)));

        let input = json!({
            "origin": { "x": 1, "label": "o" },
            "path": [{ "x": 2, "y": 3 }, { "x": 4 }],
            "extra": true
        });
        let result = validate_rules(&rules, LAX, &input);

        assert!(result.valid);
        assert_eq!(
            Value::Object(result.sanitized_body),
            json!({ "origin": { "x": 1 }, "path": [{ "x": 2 }, { "x": 4 }] })
        );
    }

    #[test]
    fn array_item_errors_aggregate_to_one_message() {
        let rules = RuleSet::new().with(
            "matrix",
            TypeDescriptor::array_of(TypeDescriptor::array_of(TypeDescriptor::number())),
        );
        let result = validate_rules(&rules, STRICT, &json!({ "matrix": [[1], ["a"], "b"] }));

        assert_eq!(
            result.errors(),
            vec!["An item in array of property matrix is not valid. All items must be of type array"]
        );
    }

    #[test]
    fn non_object_input_treats_every_property_as_absent() {
        let rules = RuleSet::new()
            .with("a", PropertyRule::new(TypeDescriptor::string()).required())
            .with("b", TypeDescriptor::string());

        let result = validate_rules(&rules, STRICT, &json!("text"));
        assert_eq!(result.errors(), vec!["Property a is required"]);

        let result = validate_rules(&RuleSet::new(), STRICT, &json!([1, 2]));
        assert!(result.valid);
    }

    #[test]
    fn violations_serialize_with_kind_tag() {
        let violation = Violation::WrongType {
            property: "age".to_string(),
            actual: "string",
            expected: "number",
        };
        assert_eq!(
            serde_json::to_value(&violation).unwrap(),
            json!({ "kind": "wrong_type", "property": "age", "actual": "string", "expected": "number" })
        );
    }
}
