//! Result printing for the CLI.
//!
//! Values go to stdout either as JSON or in their display form, colored by
//! type when stdout is a terminal.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::diagnostics::CliError;
use crate::value::Value;

/// Prints `value` to stdout.
pub fn print_value(value: &Value, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", to_json(value)?);
        return Ok(());
    }

    let choice = if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    write_value(&mut stdout, value).map_err(CliError::Output)
}

pub fn to_json(value: &Value) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn write_value(out: &mut impl WriteColor, value: &Value) -> std::io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(color_for(value)))?;
    write!(out, "{}", value)?;
    out.reset()?;
    writeln!(out)
}

fn color_for(value: &Value) -> Option<Color> {
    match value {
        Value::Number(_) => Some(Color::Cyan),
        Value::String(_) => Some(Color::Green),
        Value::Bool(_) | Value::Nil => Some(Color::Yellow),
        Value::List(_) | Value::Map(_) => None,
    }
}
