//! Declarative runtime schema validation for JSON values.
//!
//! schemy checks arbitrary JSON values against a declared shape and reports
//! every violation in a deterministic order.
//!
//! # Crate Structure
//!
//! - [`schema`] — Schema model, type matching, validation engine and the
//!   two-argument [`validate`] facade
//!
//! The `schemy` binary (behind the `cli` feature) checks JSON files against
//! definition files from the command line.

/// Re-export schema types.
pub mod schema {
    pub use schemy_schema::*;
}

pub use schemy_schema::{validate, Schema, SchemaError};
