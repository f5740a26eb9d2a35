//! Command-line arguments for the `pegloom` binary.
//!
//! Uses `clap`'s derive API: the bundled grammars are exposed as subcommands
//! and the parse configuration as global flags.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_MAX_DEPTH;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "pegloom",
    version,
    about = "Run the bundled PEG grammars and report parse failures with their location."
)]
pub struct PegloomArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Maximum nesting of parser activations before a parse is abandoned.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Print the result as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log parse activity to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// The available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a JSON document and print its value.
    Json {
        /// The path to the JSON file.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Evaluate an arithmetic expression.
    Calc {
        /// The expression, e.g. "2 * (3 + 4)".
        #[arg(required = true, allow_hyphen_values = true)]
        expr: String,
    },
}
