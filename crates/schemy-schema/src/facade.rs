//! Two-argument validation entry point.
//!
//! [`validate`] accepts either a [`Schema`] or a raw definition and hands back
//! a future of the verdict, so callers can `.await` it uniformly. The check
//! itself is synchronous: the returned future is ready on its first poll.

use std::future::{ready, Ready};

use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::matcher::type_name;
use crate::schema::Schema;

/// Second argument of [`validate`].
#[derive(Debug, Clone, Copy)]
pub enum SchemaSource<'a> {
    /// An existing schema; its cached result is updated.
    Instance(&'a Schema),
    /// A raw definition compiled into a transient schema.
    Definition(&'a Value),
}

impl<'a> From<&'a Schema> for SchemaSource<'a> {
    fn from(schema: &'a Schema) -> Self {
        Self::Instance(schema)
    }
}

impl<'a> From<&'a Value> for SchemaSource<'a> {
    fn from(definition: &'a Value) -> Self {
        Self::Definition(definition)
    }
}

/// Validate `data` against a schema or raw definition.
///
/// Resolves to the verdict only; errors stay retrievable from the schema
/// instance when one was passed. A definition that is not a JSON object
/// yields [`SchemaError::InvalidSchemaArgument`]; a malformed object yields
/// the definition error.
pub fn validate<'a>(data: &Value, source: impl Into<SchemaSource<'a>>) -> Ready<Result<bool>> {
    ready(validate_now(data, source.into()))
}

fn validate_now(data: &Value, source: SchemaSource<'_>) -> Result<bool> {
    match source {
        SchemaSource::Instance(schema) => Ok(schema.validate(data)),
        SchemaSource::Definition(definition) if definition.is_object() => {
            Ok(Schema::new(definition)?.validate(data))
        }
        SchemaSource::Definition(other) => {
            tracing::debug!(kind = type_name(Some(other)), "rejected schema argument");
            Err(SchemaError::InvalidSchemaArgument)
        }
    }
}
