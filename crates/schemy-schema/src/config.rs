/// Definition key that configures strict mode instead of declaring a property.
pub const STRICT_KEY: &str = "strict";

/// Top-level definition keys interpreted as configuration.
pub const RESERVED_KEYS: [&str; 1] = [STRICT_KEY];

/// Schema-level validation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaOptions {
    /// When true, input keys absent from the rule set are violations.
    pub strict: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// Controls loading definitions from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Maximum bytes allowed per definition file.
    pub max_definition_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_definition_size: 256 * 1024,
        }
    }
}

pub(crate) fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}
