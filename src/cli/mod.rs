//! The pegloom command-line interface.
//!
//! Runs one of the bundled grammars over a file or an argument and prints
//! the resulting value, or a located diagnostic when the parse fails.

use std::path::Path;
use std::{fs, process};

use clap::Parser as _;

use crate::cli::args::{Command, PegloomArgs};
use crate::cli::diagnostics::CliError;
use crate::config::ParseConfig;
use crate::errors::ParseError;
use crate::grammars;
use crate::value::Value;

pub mod args;
pub mod diagnostics;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = PegloomArgs::parse();
    init_logging(args.verbose);

    let config = ParseConfig::new().with_max_depth(args.max_depth);
    let result = match &args.command {
        Command::Json { file } => handle_json(file, &config),
        Command::Calc { expr } => handle_calc(expr, &config),
    }
    .and_then(|value| output::print_value(&value, args.json));

    if let Err(e) = result {
        diagnostics::report(&e);
        process::exit(1);
    }
}

/// Installs a stderr subscriber. `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Handles the `json` subcommand.
pub fn handle_json(path: &Path, config: &ParseConfig) -> Result<Value, CliError> {
    let source = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let grammar = grammars::json()?;
    grammar
        .parse_string_with(&source, config)
        .map(|success| success.output)
        .map_err(|failure| {
            CliError::from(ParseError::with_source_name(failure, path.display().to_string()))
        })
}

/// Handles the `calc` subcommand.
pub fn handle_calc(expr: &str, config: &ParseConfig) -> Result<Value, CliError> {
    let grammar = grammars::arithmetic()?;
    Ok(grammar.parse_with(expr, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calc_respects_depth_limit() {
        let expr = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(
            handle_calc(&expr, &ParseConfig::default()).unwrap(),
            Value::Number(1.0)
        );
        let err = handle_calc(&expr, &ParseConfig::new().with_max_depth(16)).unwrap_err();
        assert!(matches!(err, CliError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = handle_json(Path::new("no/such/file.json"), &ParseConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
