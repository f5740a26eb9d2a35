//! Leaf parsers: literals, regexes, and the constant outcomes.

use crate::input::Input;
use crate::outcome::{Failure, ParseResult, Success};
use crate::parser::{Parser, Pattern};
use crate::value::Value;

pub(crate) fn raw(this: &Parser, literal: &str, input: Input) -> ParseResult {
    if input.rest().starts_with(literal) {
        let rest = input.advance(literal.len());
        Ok(Success::bare(Value::from(literal), rest))
    } else {
        Err(Failure::new(input, this.clone()))
    }
}

pub(crate) fn regex(this: &Parser, pattern: &Pattern, input: Input) -> ParseResult {
    match pattern.match_len(input.rest()) {
        Some(len) => {
            let matched = &input.rest()[..len];
            Ok(Success::bare(Value::from(matched), input.advance(len)))
        }
        None => Err(Failure::new(input, this.clone())),
    }
}

pub(crate) fn succeed(value: &Value, input: Input) -> ParseResult {
    Ok(Success::bare(value.clone(), input))
}

pub(crate) fn fail(this: &Parser, input: Input) -> ParseResult {
    Err(Failure::new(input, this.clone()))
}
