//! Declarative runtime schema validation for JSON values.
//!
//! Describe the shape an object must have (property names, expected types,
//! required flags, homogeneous arrays, nested schemas and a strictness
//! policy) and check arbitrary `serde_json::Value`s against it. Every
//! violation is reported, in a deterministic order, not just the first.
//!
//! ```
//! use schemy_schema::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::new(&json!({
//!     "title": { "type": "string", "required": true },
//!     "tags": ["string"],
//! }))
//! .unwrap();
//!
//! assert!(!schema.validate(&json!({ "tags": [1] })));
//! assert_eq!(
//!     schema.validation_errors().unwrap(),
//!     vec![
//!         "Property title is required",
//!         "An item in array of property tags is not valid. All items must be of type string",
//!     ]
//! );
//! ```

pub mod config;
pub mod error;
pub mod facade;
pub mod matcher;
pub mod model;
pub mod schema;
pub mod validator;

pub use config::{LoaderConfig, SchemaOptions, RESERVED_KEYS, STRICT_KEY};
pub use error::{Result, SchemaError};
pub use facade::{validate, SchemaSource};
pub use model::{PropertyRule, RuleSet, ScalarKind, TypeDescriptor};
pub use schema::Schema;
pub use validator::{ValidationResult, Violation};
