/// Errors raised by schema construction and API misuse.
///
/// Validation findings are never errors; they are collected as
/// [`Violation`](crate::Violation)s and reflected by the verdict.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The rule definition is malformed.
    #[error("invalid schema definition for `{property}`: {reason}")]
    Definition { property: String, reason: String },

    /// Errors or body were requested before any validation ran.
    #[error("you need to call validate() before requesting validation errors or body")]
    NotValidated,

    /// The facade received something that is neither a schema nor a definition.
    #[error("second argument must be an instance of Schema or a valid schema")]
    InvalidSchemaArgument,

    /// Definition or input text is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A definition file could not be loaded.
    #[error("failed to load schema definition: {0}")]
    LoadFailed(String),
}

impl SchemaError {
    pub(crate) fn definition(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Definition {
            property: property.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
