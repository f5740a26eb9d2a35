//! Success and failure records produced by every parser activation.

use im::HashMap;

use crate::input::Input;
use crate::parser::Parser;
use crate::value::Value;

/// Named captures collected by `Binder` nodes.
///
/// Sequences store one value per name, with later captures replacing
/// earlier ones. Repetitions store a `Value::List` per name holding the
/// value from each iteration in order.
pub type Bindings = HashMap<String, Value>;

/// The outcome of running a parser against an [`Input`].
pub type ParseResult = Result<Success, Failure>;

/// A successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Success {
    pub output: Value,
    pub bindings: Bindings,
    pub remaining_input: Input,
}

impl Success {
    pub fn new(output: Value, bindings: Bindings, remaining_input: Input) -> Self {
        Self {
            output,
            bindings,
            remaining_input,
        }
    }

    /// A success with no bindings.
    pub fn bare(output: Value, remaining_input: Input) -> Self {
        Self::new(output, Bindings::new(), remaining_input)
    }

    pub fn index(&self) -> usize {
        self.remaining_input.index()
    }
}

/// Why a failure was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The input did not match.
    Mismatch,
    /// The grammar matched but left input unconsumed.
    TrailingInput,
    /// Nesting went past the configured depth limit.
    DepthExceeded,
    /// A recursive rule reference outlived the rule that owns it.
    UnresolvedRule,
}

/// A failed parse.
///
/// `failed` lists the parser frames that contributed, outermost first: each
/// combinator that passes a failure upward puts itself at the front.
/// A `fatal` failure was produced after a cut and must not be treated as
/// "try the next alternative".
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub remaining_input: Input,
    pub failed: Vec<Parser>,
    pub fatal: bool,
    pub reason: FailureReason,
}

impl Failure {
    /// A recoverable mismatch reported by `frame`.
    pub fn new(remaining_input: Input, frame: Parser) -> Self {
        Self::with_reason(remaining_input, frame, FailureReason::Mismatch)
    }

    pub fn with_reason(remaining_input: Input, frame: Parser, reason: FailureReason) -> Self {
        Self {
            remaining_input,
            failed: vec![frame],
            fatal: false,
            reason,
        }
    }

    pub fn index(&self) -> usize {
        self.remaining_input.index()
    }

    /// Labels of the contributing frames, outermost first.
    pub fn trace(&self) -> Vec<String> {
        self.failed
            .iter()
            .filter_map(|frame| frame.trace_name())
            .map(str::to_string)
            .collect()
    }

    /// The frame where the failure originated.
    pub fn innermost(&self) -> Option<&Parser> {
        self.failed.last()
    }

    /// What the innermost frame was looking for, e.g. `"b"`.
    pub fn expected(&self) -> Option<String> {
        self.innermost().map(Parser::describe)
    }

    /// Prepends `frame` to the trace, keeping fatality and reason.
    pub(crate) fn wrap(mut self, frame: &Parser) -> Self {
        self.failed.insert(0, frame.clone());
        self
    }

    /// Prepends `frame` and marks the failure fatal.
    pub(crate) fn escalate(self, frame: &Parser) -> Self {
        let mut failure = self.wrap(frame);
        failure.fatal = true;
        failure
    }
}
