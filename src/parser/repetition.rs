//! Zero-or-more and exactly-n repetition.
//!
//! Both collect one output per iteration into a list. Bindings are
//! accumulated per name: each name maps to a `Value::List` of the values
//! bound in each iteration, in order.

use std::collections::HashMap;

use crate::engine::ParseContext;
use crate::input::Input;
use crate::outcome::{Bindings, ParseResult, Success};
use crate::parser::Parser;
use crate::value::Value;

/// Per-name lists of the values bound across iterations.
#[derive(Default)]
struct Accumulated {
    outputs: Vec<Value>,
    bindings: HashMap<String, Vec<Value>>,
}

impl Accumulated {
    fn push(&mut self, success: Success) {
        for (name, value) in success.bindings {
            self.bindings.entry(name).or_default().push(value);
        }
        self.outputs.push(success.output);
    }

    fn finish(self, remaining: Input) -> Success {
        let bindings: Bindings = self
            .bindings
            .into_iter()
            .map(|(name, values)| (name, Value::List(values)))
            .collect();
        Success::new(Value::List(self.outputs), bindings, remaining)
    }
}

/// Applies `child` until it fails. A recoverable failure ends the loop
/// successfully; a fatal one poisons the whole repetition.
pub(crate) fn rep(this: &Parser, child: &Parser, input: Input, ctx: &mut ParseContext) -> ParseResult {
    let mut current = input;
    let mut acc = Accumulated::default();

    loop {
        match ctx.run(child, current.clone()) {
            Ok(success) => {
                let advanced = success.index() > current.index();
                current = success.remaining_input.clone();
                acc.push(success);
                // A match that consumed nothing would match forever.
                if !advanced {
                    break;
                }
            }
            Err(failure) if failure.fatal => return Err(failure.wrap(this)),
            Err(_) => break,
        }
    }

    Ok(acc.finish(current))
}

/// Applies `child` exactly `n` times; any failure fails the repetition.
pub(crate) fn rep_n(
    this: &Parser,
    child: &Parser,
    n: usize,
    input: Input,
    ctx: &mut ParseContext,
) -> ParseResult {
    let mut current = input;
    let mut acc = Accumulated::default();

    for _ in 0..n {
        let success = ctx.run(child, current).map_err(|failure| failure.wrap(this))?;
        current = success.remaining_input.clone();
        acc.push(success);
    }

    Ok(acc.finish(current))
}
