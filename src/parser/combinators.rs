//! Sequencing, choice, and lookahead.

use tracing::trace;

use crate::engine::ParseContext;
use crate::input::Input;
use crate::outcome::{Bindings, Failure, FailureReason, ParseResult, Success};
use crate::parser::{Parser, Step};
use crate::value::Value;

pub(crate) fn full(this: &Parser, child: &Parser, input: Input, ctx: &mut ParseContext) -> ParseResult {
    let success = ctx.run(child, input)?;
    if success.remaining_input.is_at_end() {
        Ok(success)
    } else {
        Err(Failure::with_reason(
            success.remaining_input,
            this.clone(),
            FailureReason::TrailingInput,
        ))
    }
}

/// Runs `steps` in order over an advancing cursor.
///
/// A failure after a cut, or a fatal failure from a child, is escalated to a
/// fatal failure with this sequence on the trace. Any other failure passes
/// through untouched so an enclosing choice can try its next alternative.
pub(crate) fn seq(this: &Parser, steps: &[Step], input: Input, ctx: &mut ParseContext) -> ParseResult {
    let mut current = input;
    let mut results = Vec::with_capacity(steps.len());
    let mut bindings = Bindings::new();
    let mut committed = false;

    for step in steps {
        let child = match step {
            Step::Cut => {
                trace!(index = current.index(), "cut");
                committed = true;
                continue;
            }
            Step::Parse(child) => child,
        };

        match ctx.run(child, current.clone()) {
            Ok(success) => {
                current = success.remaining_input;
                results.push(success.output);
                bindings.extend(success.bindings);
            }
            Err(failure) if committed || failure.fatal => return Err(failure.escalate(this)),
            Err(failure) => return Err(failure),
        }
    }

    Ok(Success::new(Value::List(results), bindings, current))
}

/// Ordered choice: the first child to succeed wins.
pub(crate) fn or(this: &Parser, children: &[Parser], input: Input, ctx: &mut ParseContext) -> ParseResult {
    for child in children {
        match ctx.run(child, input.clone()) {
            Ok(success) => return Ok(success),
            Err(failure) if failure.fatal => return Err(failure.wrap(this)),
            Err(_) => {}
        }
    }
    Err(Failure::new(input, this.clone()))
}

/// Every child must succeed on the same input. The first child's result is
/// returned; the first failure in child order is reported.
pub(crate) fn and(this: &Parser, children: &[Parser], input: Input, ctx: &mut ParseContext) -> ParseResult {
    let mut first = None;
    for child in children {
        match ctx.run(child, input.clone()) {
            Ok(success) => {
                if first.is_none() {
                    first = Some(success);
                }
            }
            Err(failure) => return Err(failure.wrap(this)),
        }
    }
    Ok(first.unwrap_or_else(|| Success::bare(Value::Nil, input)))
}

/// Negative lookahead. Never moves the cursor.
///
/// Any mismatch of the child, fatal or not, counts as success here. Depth
/// and unresolved-rule failures are not mismatches and propagate.
pub(crate) fn not(this: &Parser, child: &Parser, input: Input, ctx: &mut ParseContext) -> ParseResult {
    match ctx.run(child, input.clone()) {
        Ok(_) => Err(Failure::new(input, this.clone())),
        Err(failure) if failure.reason == FailureReason::Mismatch => {
            Ok(Success::bare(Value::Nil, input))
        }
        Err(failure) => Err(failure.wrap(this)),
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn seq_collects_outputs_and_bindings() {
        let grammar = seq![
            Parser::raw("a").bind("x"),
            Parser::raw("b").bind("y"),
        ];
        let success = grammar.parse_partial("ab").unwrap();
        assert_eq!(success.output, Value::List(vec!["a".into(), "b".into()]));
        assert_eq!(success.bindings.get("x"), Some(&Value::from("a")));
        assert_eq!(success.bindings.get("y"), Some(&Value::from("b")));
        assert_eq!(success.index(), 2);
    }

    #[test]
    fn seq_later_binding_overwrites() {
        let grammar = seq![Parser::raw("a").bind("x"), Parser::raw("b").bind("x")];
        let success = grammar.parse_partial("ab").unwrap();
        assert_eq!(success.bindings.get("x"), Some(&Value::from("b")));
        assert_eq!(success.bindings.len(), 1);
    }

    #[test]
    fn seq_failure_before_cut_is_recoverable() {
        let b = Parser::raw("b");
        let grammar = seq![Parser::raw("a"), b.clone(), CUT];
        let failure = grammar.parse_partial("ac").unwrap_err();
        assert!(!failure.fatal);
        assert_eq!(failure.index(), 1);
        // Passed through unchanged: the sequence is not on the trace.
        assert_eq!(failure.failed, vec![b]);
    }

    #[test]
    fn seq_failure_after_cut_is_fatal() {
        let b = Parser::raw("b");
        let grammar = seq![Parser::raw("a"), CUT, b.clone()];
        let failure = grammar.parse_partial("ac").unwrap_err();
        assert!(failure.fatal);
        assert_eq!(failure.index(), 1);
        assert_eq!(failure.failed, vec![grammar, b]);
    }

    #[test]
    fn seq_propagates_nested_fatal_failures() {
        let inner = seq![Parser::raw("a"), CUT, Parser::raw("b")];
        let outer = seq![Parser::raw("("), inner.clone()];
        let failure = outer.parse_partial("(ac").unwrap_err();
        assert!(failure.fatal);
        assert!(failure.failed[0].ptr_eq(&outer));
        assert!(failure.failed[1].ptr_eq(&inner));
    }

    #[test]
    fn cut_prevents_later_alternatives() {
        let grammar = Parser::choice([
            seq![Parser::raw("a"), CUT, Parser::raw("b")],
            Parser::raw("ac"),
        ]);
        let failure = grammar.parse_partial("ac").unwrap_err();
        assert!(failure.fatal);
        assert!(failure.failed[0].ptr_eq(&grammar));
        assert!(grammar.parse("ac").is_err());
    }

    #[test]
    fn without_cut_choice_backtracks() {
        let grammar = Parser::choice([
            seq![Parser::raw("a"), Parser::raw("b")],
            Parser::raw("ac"),
        ]);
        assert_eq!(grammar.parse("ac").unwrap(), Value::from("ac"));
    }

    #[test]
    fn cut_inside_one_branch_is_local_to_that_sequence() {
        // The committed sequence succeeded, so the outer choice is unaffected.
        let grammar = Parser::choice([seq![Parser::raw("a"), CUT], Parser::raw("b")]);
        assert!(grammar.parse_partial("b").is_ok());
    }

    #[test]
    fn choice_reports_itself_when_all_fail() {
        let grammar = Parser::choice([Parser::raw("a"), Parser::raw("b")]);
        let failure = grammar.parse_input(Input::new("xc", 1)).unwrap_err();
        assert_eq!(failure.failed, vec![grammar]);
        assert_eq!(failure.index(), 1);
        assert!(!failure.fatal);
        assert_eq!(failure.expected().as_deref(), Some("\"a\" or \"b\""));
    }

    #[test]
    fn choice_returns_first_success_unchanged() {
        let grammar = Parser::choice([Parser::raw("a").bind("n"), Parser::raw("ab")]);
        let success = grammar.parse_partial("ab").unwrap();
        assert_eq!(success.output, Value::from("a"));
        assert_eq!(success.bindings.get("n"), Some(&Value::from("a")));
    }

    #[test]
    fn and_runs_children_on_same_input() {
        let word = Parser::regex("[a-z]+").unwrap();
        let grammar = Parser::all([word.clone(), Parser::raw("ab")]);
        let success = grammar.parse_partial("abc").unwrap();
        assert_eq!(success.output, Value::from("abc"));
        assert_eq!(success.index(), 3);

        let failure = grammar.parse_partial("xyz").unwrap_err();
        assert!(failure.failed[0].ptr_eq(&grammar));
    }

    #[test]
    fn and_of_same_parser_matches_parser() {
        let p = Parser::raw("hi");
        let both = Parser::all([p.clone(), p.clone()]);
        for text in ["hi", "ho", "hii", ""] {
            let lone = p.parse_partial(text);
            let pair = both.parse_partial(text);
            assert_eq!(lone.is_ok(), pair.is_ok(), "input {:?}", text);
            if let (Ok(a), Ok(b)) = (lone, pair) {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn not_never_consumes() {
        let input = Input::new("abc", 1);
        for child in [Parser::raw("b"), Parser::raw("z"), Parser::regex("b+c").unwrap()] {
            let result = Parser::negate(child).parse_input(input.clone());
            let remaining = match result {
                Ok(success) => success.remaining_input,
                Err(failure) => failure.remaining_input,
            };
            assert_eq!(remaining, input);
        }
    }

    #[test]
    fn not_inverts_child() {
        assert!(Parser::negate(Parser::raw("a")).parse_partial("b").is_ok());
        assert!(Parser::negate(Parser::raw("a")).parse_partial("a").is_err());
        // A committed failure in the child is still just "did not match".
        let committed = seq![Parser::raw("a"), CUT, Parser::raw("b")];
        assert!(Parser::negate(committed).parse_partial("ac").is_ok());
    }

    #[test]
    fn full_rejects_trailing_input() {
        let a = Parser::raw("a");
        let full = Parser::full(a.clone());
        let failure = full.parse_input(Input::start("ab")).unwrap_err();
        assert_eq!(failure.reason, FailureReason::TrailingInput);
        assert_eq!(failure.failed, vec![full.clone()]);
        assert_eq!(failure.index(), 1);

        let success = a.parse_input(Input::start("ab")).unwrap();
        assert_eq!(success.index(), 1);
        assert!(full.parse_input(Input::start("a")).is_ok());
    }
}
