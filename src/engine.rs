//! The recursive-descent driver.
//!
//! Every parser activation goes through [`ParseContext::run`], which keeps
//! the nesting depth in check and dispatches on the parser variant. Each
//! activation also makes sure enough native stack is left for the next one,
//! growing it on the heap when it runs low, so the depth limit is what stops
//! runaway recursion and not the thread's stack size.

use tracing::trace;

use crate::config::ParseConfig;
use crate::input::Input;
use crate::outcome::{Failure, FailureReason, ParseResult};
use crate::parser::{combinators, lazy, primitives, repetition, transform, Parser, ParserKind};

/// Stack that must remain before dispatching another activation.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment once the red zone is reached.
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Per-parse state threaded through every activation.
pub(crate) struct ParseContext<'c> {
    config: &'c ParseConfig,
    depth: usize,
}

impl<'c> ParseContext<'c> {
    pub(crate) fn new(config: &'c ParseConfig) -> Self {
        Self { config, depth: 0 }
    }

    /// Runs `parser` at `input`.
    pub(crate) fn run(&mut self, parser: &Parser, input: Input) -> ParseResult {
        if self.depth >= self.config.max_depth {
            trace!(
                index = input.index(),
                max_depth = self.config.max_depth,
                "depth limit reached"
            );
            let mut failure =
                Failure::with_reason(input, parser.clone(), FailureReason::DepthExceeded);
            failure.fatal = true;
            return Err(failure);
        }

        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.dispatch(parser, input));
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, parser: &Parser, input: Input) -> ParseResult {
        match parser.kind() {
            ParserKind::Full(child) => combinators::full(parser, child, input, self),
            ParserKind::Raw(literal) => primitives::raw(parser, literal, input),
            ParserKind::Regex(pattern) => primitives::regex(parser, pattern, input),
            ParserKind::Seq(steps) => combinators::seq(parser, steps, input, self),
            ParserKind::Or(children) => combinators::or(parser, children, input, self),
            ParserKind::And(children) => combinators::and(parser, children, input, self),
            ParserKind::Not(child) => combinators::not(parser, child, input, self),
            ParserKind::Rep(child) => repetition::rep(parser, child, input, self),
            ParserKind::RepN(child, n) => repetition::rep_n(parser, child, *n, input, self),
            ParserKind::Transform(child, func) => {
                transform::transform(parser, child, func, input, self)
            }
            ParserKind::TransformBound(child, func) => {
                transform::transform_bound(parser, child, func, input, self)
            }
            ParserKind::Binder(child, name) => transform::binder(parser, child, name, input, self),
            ParserKind::Lazy(rule) => lazy::parse_rule(parser, rule, input, self),
            ParserKind::Succeed(value) => primitives::succeed(value, input),
            ParserKind::Fail => primitives::fail(parser, input),
        }
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[cfg(target_arch = "wasm32")]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
