use std::fs;
use std::path::Path;

use schemy_schema::{LoaderConfig, Schema, SchemaOptions};
use serde_json::Value;

use crate::cmd::CheckArgs;
use crate::exit::{io_error, schema_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_check, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let config = LoaderConfig {
        max_definition_size: args.max_schema_size,
    };
    let schema = Schema::from_file_with_config(&args.schema, config).map_err(|err| {
        schema_error(&format!("invalid schema {}", args.schema.display()), err)
    })?;
    let schema = apply_overrides(schema, args.non_strict);
    let input = read_input(&args.input)?;

    let valid = schema.validate(&input);
    let result = schema
        .last_result()
        .map_err(|err| schema_error("validation result unavailable", err))?;
    tracing::info!(
        schema = %args.schema.display(),
        input = %args.input.display(),
        valid,
        errors = result.violations.len(),
        "checked document"
    );
    print_check(&result, args.body, format);

    Ok(if valid { SUCCESS } else { DATA_INVALID })
}

fn apply_overrides(schema: Schema, non_strict: bool) -> Schema {
    if !non_strict || !schema.options().strict {
        return schema;
    }
    Schema::from_rules(schema.rules().clone(), SchemaOptions { strict: false })
}

fn read_input(path: &Path) -> CliResult<Value> {
    let bytes =
        fs::read(path).map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(
            DATA_INVALID,
            format!("{} is not valid JSON: {err}", path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn non_strict_override_relaxes_extra_keys() {
        let schema = Schema::new(&json!({ "title": "string" })).unwrap();
        let relaxed = apply_overrides(schema, true);

        assert!(!relaxed.options().strict);
        assert!(relaxed.validate(&json!({ "title": "t", "extra": 1 })));
    }

    #[test]
    fn override_is_a_no_op_without_flag() {
        let schema = Schema::new(&json!({ "title": "string" })).unwrap();
        assert!(apply_overrides(schema, false).options().strict);
    }

    #[test]
    fn unreadable_input_maps_to_no_input() {
        let err = read_input(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.code, crate::exit::NO_INPUT);
    }
}
