//! Ready-made grammars built with the combinators.
//!
//! They double as worked examples of the construction API: recursive rules,
//! cuts placed right after a construct is recognised, and bound transforms
//! that turn named captures into values.

use crate::parser::Parser;
use crate::value::Value;

pub mod arithmetic;
pub mod json;

pub use arithmetic::arithmetic;
pub use json::json;

/// `parser` followed by optional whitespace; yields `parser`'s output.
pub(crate) fn token(parser: Parser, ws: &Parser) -> Parser {
    crate::seq![parser, ws.clone()].map_items(nth(0))
}

/// Picks item `index` out of a sequence's output.
pub(crate) fn nth(index: usize) -> impl Fn(Vec<Value>) -> Value + Send + Sync + 'static {
    move |mut items| {
        if index < items.len() {
            items.swap_remove(index)
        } else {
            Value::Nil
        }
    }
}
