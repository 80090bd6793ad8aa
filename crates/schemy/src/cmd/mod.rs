use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod check;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a JSON document against a schema definition.
    Check(CheckArgs),
    /// Print the normalized rules of a schema definition.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema definition file (JSON).
    pub schema: PathBuf,
    /// Document to validate (JSON).
    pub input: PathBuf,
    /// Accept keys the schema does not declare, overriding the definition.
    #[arg(long)]
    pub non_strict: bool,
    /// Include the sanitized body in the report.
    #[arg(long)]
    pub body: bool,
    /// Maximum schema definition size in bytes.
    #[arg(long, value_name = "BYTES", default_value_t = 256 * 1024)]
    pub max_schema_size: usize,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Schema definition file (JSON).
    pub schema: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
