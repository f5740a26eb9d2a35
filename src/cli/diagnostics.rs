//! Errors surfaced by the `pegloom` binary and their presentation.
//!
//! Every failure is rendered as a `miette` report on stderr. Colors are used
//! only when stderr is a terminal.

use std::path::PathBuf;

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use thiserror::Error;

use crate::errors::{GrammarError, ParseError};

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("could not read `{}`", .path.display())]
    #[diagnostic(code(pegloom::cli::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode the result as JSON")]
    #[diagnostic(code(pegloom::cli::json))]
    Json(#[from] serde_json::Error),

    #[error("could not write output")]
    #[diagnostic(code(pegloom::cli::output))]
    Output(#[source] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Grammar(#[from] GrammarError),

    #[error("parse failed at line {}, column {}", .0.line(), .0.column())]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

/// Renders `error` as a report. Plain ASCII when `color` is off.
pub fn render(error: &CliError, color: bool) -> String {
    let theme = if color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let mut out = String::new();
    if GraphicalReportHandler::new_themed(theme)
        .render_report(&mut out, error)
        .is_err()
    {
        // Fall back to the plain rendering.
        out = format!("Error: {}", error);
    }
    out
}

/// Prints `error` to stderr.
pub fn report(error: &CliError) {
    eprintln!("{}", render(error, atty::is(atty::Stream::Stderr)));
}
