mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "schemy", version, about = "Schema validation CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "SCHEMY_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::try_parse_from([
            "schemy",
            "check",
            "/tmp/schema.json",
            "/tmp/input.json",
            "--non-strict",
            "--body",
        ])
        .expect("check args should parse");

        match cli.command {
            Command::Check(args) => {
                assert!(args.non_strict);
                assert!(args.body);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn check_requires_input_path() {
        let err = Cli::try_parse_from(["schemy", "check", "/tmp/schema.json"])
            .expect_err("missing input should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "schemy",
            "inspect",
            "/tmp/schema.json",
            "--format",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("inspect args should parse");

        assert!(matches!(cli.command, Command::Inspect(_)));
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.log_level, LogLevel::Debug));
    }
}
