use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use schemy_schema::{Schema, ValidationResult};
use serde::Serialize;
use serde_json::{Map, Value};

const CHECK_SCHEMA_ID: &str = "https://schemas.3leaps.dev/schemy/cli/v1/check-result.schema.json";
const INSPECT_SCHEMA_ID: &str = "https://schemas.3leaps.dev/schemy/cli/v1/schema-info.schema.json";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    schema_id: &'a str,
    valid: bool,
    errors: Vec<String>,
    violations: &'a [schemy_schema::Violation],
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a Map<String, Value>>,
}

pub fn print_check(result: &ValidationResult, include_body: bool, format: OutputFormat) {
    let body = include_body.then_some(&result.sanitized_body);

    match format {
        OutputFormat::Json => {
            let out = CheckOutput {
                schema_id: CHECK_SCHEMA_ID,
                valid: result.valid,
                errors: result.errors(),
                violations: &result.violations,
                body,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            if !result.violations.is_empty() {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["#", "PROPERTY", "ERROR"]);
                for (idx, violation) in result.violations.iter().enumerate() {
                    table.add_row(vec![
                        (idx + 1).to_string(),
                        violation.property().to_string(),
                        violation.to_string(),
                    ]);
                }
                println!("{table}");
            }
            println!("{}", verdict_line(result));
            if let Some(body) = body {
                println!("{}", pretty_json(body));
            }
        }
        OutputFormat::Pretty => {
            println!("{}", verdict_line(result));
            for error in result.errors() {
                println!("  - {error}");
            }
            if let Some(body) = body {
                println!("{}", pretty_json(body));
            }
        }
    }
}

#[derive(Serialize)]
struct PropertyOutput<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    descriptor: String,
    required: bool,
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    schema_id: &'a str,
    strict: bool,
    properties: Vec<PropertyOutput<'a>>,
}

pub fn print_schema(schema: &Schema, format: OutputFormat) {
    let properties: Vec<PropertyOutput<'_>> = schema
        .rules()
        .iter()
        .map(|(name, rule)| PropertyOutput {
            name,
            descriptor: rule.descriptor.to_string(),
            required: rule.required,
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let out = InspectOutput {
                schema_id: INSPECT_SCHEMA_ID,
                strict: schema.options().strict,
                properties,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PROPERTY", "TYPE", "REQUIRED"]);
            for property in &properties {
                table.add_row(vec![
                    property.name.to_string(),
                    property.descriptor.clone(),
                    property.required.to_string(),
                ]);
            }
            println!("{table}");
            println!("strict: {}", schema.options().strict);
        }
        OutputFormat::Pretty => {
            println!("strict={}", schema.options().strict);
            for property in &properties {
                let marker = if property.required { " (required)" } else { "" };
                println!("  {}: {}{marker}", property.name, property.descriptor);
            }
        }
    }
}

fn verdict_line(result: &ValidationResult) -> String {
    if result.valid {
        "valid".to_string()
    } else {
        format!("invalid ({} errors)", result.violations.len())
    }
}

fn pretty_json(body: &Map<String, Value>) -> String {
    serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string())
}
