//! Normalized schema model and the raw-definition parser.
//!
//! A raw definition is a JSON object mapping property names to either a
//! descriptor object (`{"type": T, "required": bool}`) or a bare type `T`.
//! A type is a scalar name (`"string"`), a one-element array (`["string"]`,
//! an array of that type) or an object (a nested rule definition).

use std::fmt;

use serde_json::{Map, Value};

use crate::config::{is_reserved_key, SchemaOptions, STRICT_KEY};
use crate::error::{Result, SchemaError};
use crate::matcher::type_name;

const TYPE_KEY: &str = "type";
const REQUIRED_KEY: &str = "required";

/// Scalar runtime kinds a property can be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    Object,
    Date,
    Function,
}

impl ScalarKind {
    /// Resolve a type name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "object" => Self::Object,
            "date" => Self::Date,
            "function" => Self::Function,
            _ => return None,
        };
        Some(kind)
    }

    /// Lowercase name used in violation messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Date => "date",
            Self::Function => "function",
        }
    }
}

/// Expected shape of a property value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    /// Homogeneous array; every element must match the inner descriptor.
    ArrayOf(Box<TypeDescriptor>),
    /// Object that must itself satisfy an embedded rule set.
    NestedSchema(RuleSet),
}

impl TypeDescriptor {
    pub fn string() -> Self {
        Self::Scalar(ScalarKind::String)
    }

    pub fn number() -> Self {
        Self::Scalar(ScalarKind::Number)
    }

    pub fn boolean() -> Self {
        Self::Scalar(ScalarKind::Boolean)
    }

    pub fn object() -> Self {
        Self::Scalar(ScalarKind::Object)
    }

    pub fn date() -> Self {
        Self::Scalar(ScalarKind::Date)
    }

    pub fn function() -> Self {
        Self::Scalar(ScalarKind::Function)
    }

    pub fn array_of(inner: TypeDescriptor) -> Self {
        Self::ArrayOf(Box::new(inner))
    }

    pub fn nested(rules: RuleSet) -> Self {
        Self::NestedSchema(rules)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.write_str(kind.name()),
            Self::ArrayOf(inner) => write!(f, "[{inner}]"),
            Self::NestedSchema(rules) => {
                f.write_str("{")?;
                for (idx, (name, rule)) in rules.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {}", rule.descriptor)?;
                    if rule.required {
                        f.write_str("!")?;
                    }
                }
                f.write_str("}")
            }
        }
    }
}

/// One property's declared type and presence requirement.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRule {
    pub descriptor: TypeDescriptor,
    pub required: bool,
}

impl PropertyRule {
    /// Optional property of the given type.
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            required: false,
        }
    }

    /// Mark the property as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl From<TypeDescriptor> for PropertyRule {
    fn from(descriptor: TypeDescriptor) -> Self {
        Self::new(descriptor)
    }
}

/// Ordered property rules. Definition order is the error-reporting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    entries: Vec<(String, PropertyRule)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`RuleSet::insert`].
    pub fn with(mut self, name: impl Into<String>, rule: impl Into<PropertyRule>) -> Self {
        self.insert(name, rule);
        self
    }

    /// Add a rule. Redefining a name replaces its rule but keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, rule: impl Into<PropertyRule>) {
        let name = name.into();
        let rule = rule.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = rule,
            None => self.entries.push((name, rule)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyRule> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rule)| rule)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyRule)> {
        self.entries.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a raw top-level definition into rules and schema options.
    pub fn parse(definition: &Value) -> Result<(Self, SchemaOptions)> {
        let map = definition.as_object().ok_or_else(|| {
            SchemaError::definition("<root>", "schema definition must be a JSON object")
        })?;
        parse_rules(map, None)
    }
}

fn parse_rules(
    map: &Map<String, Value>,
    parent: Option<&str>,
) -> Result<(RuleSet, SchemaOptions)> {
    let mut rules = RuleSet::new();
    let mut options = SchemaOptions::default();

    for (key, value) in map {
        if is_reserved_key(key) {
            match parent {
                None => options = parse_options(key, value)?,
                Some(path) => {
                    tracing::debug!(path, key = %key, "ignoring reserved key in nested schema")
                }
            }
            continue;
        }

        let path = join_path(parent, key);
        rules.insert(key.clone(), parse_property(&path, value)?);
    }

    Ok((rules, options))
}

fn parse_options(key: &str, value: &Value) -> Result<SchemaOptions> {
    debug_assert_eq!(key, STRICT_KEY);
    match value {
        Value::Bool(strict) => Ok(SchemaOptions { strict: *strict }),
        other => Err(SchemaError::definition(
            key,
            format!("`{STRICT_KEY}` must be a boolean, found {}", kind_of(other)),
        )),
    }
}

fn parse_property(path: &str, value: &Value) -> Result<PropertyRule> {
    match value {
        Value::String(_) | Value::Array(_) => Ok(PropertyRule::new(parse_type(path, value)?)),
        Value::Object(descriptor) => parse_descriptor(path, descriptor),
        other => Err(SchemaError::definition(
            path,
            format!(
                "expected a type name, an array type or a descriptor object, found {}",
                kind_of(other)
            ),
        )),
    }
}

fn parse_descriptor(path: &str, descriptor: &Map<String, Value>) -> Result<PropertyRule> {
    if let Some(unknown) = descriptor
        .keys()
        .find(|key| *key != TYPE_KEY && *key != REQUIRED_KEY)
    {
        return Err(SchemaError::definition(
            path,
            format!("unknown descriptor key `{unknown}`"),
        ));
    }

    let type_value = descriptor
        .get(TYPE_KEY)
        .ok_or_else(|| SchemaError::definition(path, "missing `type`"))?;
    let required = match descriptor.get(REQUIRED_KEY) {
        None => false,
        Some(Value::Bool(required)) => *required,
        Some(other) => {
            return Err(SchemaError::definition(
                path,
                format!("`required` must be a boolean, found {}", kind_of(other)),
            ))
        }
    };

    Ok(PropertyRule {
        descriptor: parse_type(path, type_value)?,
        required,
    })
}

fn parse_type(path: &str, value: &Value) -> Result<TypeDescriptor> {
    match value {
        Value::String(name) => ScalarKind::from_name(name)
            .map(TypeDescriptor::Scalar)
            .ok_or_else(|| SchemaError::definition(path, format!("unsupported type `{name}`"))),
        Value::Array(items) => match items.as_slice() {
            [inner] => Ok(TypeDescriptor::array_of(parse_type(path, inner)?)),
            _ => Err(SchemaError::definition(
                path,
                format!(
                    "array type must name exactly one element type, found {}",
                    items.len()
                ),
            )),
        },
        Value::Object(nested) => {
            let (rules, _) = parse_rules(nested, Some(path))?;
            Ok(TypeDescriptor::NestedSchema(rules))
        }
        other => Err(SchemaError::definition(
            path,
            format!("unsupported type descriptor {}", kind_of(other)),
        )),
    }
}

pub(crate) fn join_path(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}.{key}"),
        None => key.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    type_name(Some(value))
}
