use schemy_schema::Schema;

use crate::cmd::InspectArgs;
use crate::exit::{schema_error, CliResult, SUCCESS};
use crate::output::{print_schema, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let schema = Schema::from_file(&args.schema).map_err(|err| {
        schema_error(&format!("invalid schema {}", args.schema.display()), err)
    })?;
    print_schema(&schema, format);
    Ok(SUCCESS)
}
