//! Output transforms and named captures.

use crate::engine::ParseContext;
use crate::input::Input;
use crate::outcome::{Bindings, ParseResult, Success};
use crate::parser::{BoundFn, Parser, TransformFn};

pub(crate) fn transform(
    this: &Parser,
    child: &Parser,
    func: &TransformFn,
    input: Input,
    ctx: &mut ParseContext,
) -> ParseResult {
    let mut success = ctx.run(child, input).map_err(|failure| failure.wrap(this))?;
    success.output = func(std::mem::take(&mut success.output));
    Ok(success)
}

/// Calls `func` with the child's bindings. The bindings are consumed by the
/// call, so the result carries none.
pub(crate) fn transform_bound(
    this: &Parser,
    child: &Parser,
    func: &BoundFn,
    input: Input,
    ctx: &mut ParseContext,
) -> ParseResult {
    let success = ctx.run(child, input).map_err(|failure| failure.wrap(this))?;
    let output = func(&success.bindings);
    Ok(Success::new(output, Bindings::new(), success.remaining_input))
}

pub(crate) fn binder(
    this: &Parser,
    child: &Parser,
    name: &str,
    input: Input,
    ctx: &mut ParseContext,
) -> ParseResult {
    let mut success = ctx.run(child, input).map_err(|failure| failure.wrap(this))?;
    success
        .bindings
        .insert(name.to_string(), success.output.clone());
    Ok(success)
}
