use std::io::Read;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

use crate::config::{LoaderConfig, SchemaOptions};
use crate::error::{Result, SchemaError};
use crate::model::RuleSet;
use crate::validator::{validate_rules, ValidationResult, Violation};

/// A compiled rule set plus the result of its most recent validation.
///
/// Validation takes `&self`, so a schema can be shared across threads.
/// Concurrent validations on one instance race on the cached result (last
/// write wins); use separate instances when callers need isolation.
#[derive(Debug)]
pub struct Schema {
    rules: RuleSet,
    options: SchemaOptions,
    last_result: Mutex<Option<ValidationResult>>,
}

impl Schema {
    /// Build a schema from a raw JSON definition.
    pub fn new(definition: &Value) -> Result<Self> {
        let (rules, options) = RuleSet::parse(definition)?;
        tracing::debug!(
            properties = rules.len(),
            strict = options.strict,
            "schema constructed"
        );
        Ok(Self::from_rules(rules, options))
    }

    /// Build a schema from already-normalized rules.
    pub fn from_rules(rules: RuleSet, options: SchemaOptions) -> Self {
        Self {
            rules,
            options,
            last_result: Mutex::new(None),
        }
    }

    /// Build a schema from definition JSON text.
    pub fn from_json_str(definition: &str) -> Result<Self> {
        let definition: Value = serde_json::from_str(definition)?;
        Self::new(&definition)
    }

    /// Load a definition file with default limits.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_with_config(path, LoaderConfig::default())
    }

    /// Load a definition file with explicit limits. Symlinks are refused.
    pub fn from_file_with_config(path: &Path, config: LoaderConfig) -> Result<Self> {
        let path_metadata = std::fs::symlink_metadata(path)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;
        if path_metadata.file_type().is_symlink() {
            return Err(SchemaError::LoadFailed(format!(
                "refusing to load schema symlink: {}",
                path.display()
            )));
        }
        if !path_metadata.is_file() {
            return Err(SchemaError::LoadFailed(format!(
                "not a regular file: {}",
                path.display()
            )));
        }
        if path_metadata.len() > config.max_definition_size as u64 {
            return Err(SchemaError::LoadFailed(format!(
                "schema file too large ({} bytes): {}",
                path_metadata.len(),
                path.display()
            )));
        }

        let file = std::fs::File::open(path).map_err(|err| {
            SchemaError::LoadFailed(format!("failed opening schema {}: {err}", path.display()))
        })?;

        let max_bytes = config.max_definition_size;
        let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
        let mut content = String::new();
        file.take(read_limit)
            .read_to_string(&mut content)
            .map_err(|err| {
                SchemaError::LoadFailed(format!("failed reading schema {}: {err}", path.display()))
            })?;
        if content.len() > max_bytes {
            return Err(SchemaError::LoadFailed(format!(
                "schema file too large while reading: {}",
                path.display()
            )));
        }

        tracing::debug!(path = %path.display(), bytes = content.len(), "loaded schema definition");
        Self::from_json_str(&content)
    }

    /// Validate `input`, replacing the cached result. Returns the verdict.
    pub fn validate(&self, input: &Value) -> bool {
        let result = validate_rules(&self.rules, self.options, input);
        let valid = result.valid;
        tracing::debug!(
            properties = self.rules.len(),
            violations = result.violations.len(),
            valid,
            "validation finished"
        );
        *self.cache() = Some(result);
        valid
    }

    /// Error messages from the most recent validation.
    pub fn validation_errors(&self) -> Result<Vec<String>> {
        self.with_last(ValidationResult::errors)
    }

    /// Structured violations from the most recent validation.
    pub fn violations(&self) -> Result<Vec<Violation>> {
        self.with_last(|result| result.violations.clone())
    }

    /// Sanitized body from the most recent validation.
    pub fn body(&self) -> Result<Map<String, Value>> {
        self.with_last(|result| result.sanitized_body.clone())
    }

    /// Full copy of the most recent result.
    pub fn last_result(&self) -> Result<ValidationResult> {
        self.with_last(Clone::clone)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn options(&self) -> SchemaOptions {
        self.options
    }

    fn with_last<T>(&self, read: impl FnOnce(&ValidationResult) -> T) -> Result<T> {
        self.cache().as_ref().map(read).ok_or(SchemaError::NotValidated)
    }

    // The cache only ever holds a complete result, so a poisoned lock is safe to reuse.
    fn cache(&self) -> MutexGuard<'_, Option<ValidationResult>> {
        self.last_result.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TryFrom<&Value> for Schema {
    type Error = SchemaError;

    fn try_from(definition: &Value) -> Result<Self> {
        Self::new(definition)
    }
}

impl std::str::FromStr for Schema {
    type Err = SchemaError;

    fn from_str(definition: &str) -> Result<Self> {
        Self::from_json_str(definition)
    }
}
