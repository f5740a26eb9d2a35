//! Infix arithmetic over floating point numbers.
//!
//! `+ -` bind looser than `* /`, both left-associative; unary minus and
//! parentheses nest freely. The grammar evaluates as it parses and yields a
//! single `Value::Number`.

use crate::errors::GrammarError;
use crate::grammars::{nth, token};
use crate::outcome::Bindings;
use crate::parser::{Parser, CUT};
use crate::seq;
use crate::value::Value;

const WHITESPACE: &str = r"\s*";
const NUMBER: &str = r"[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?";

/// A grammar for a complete arithmetic expression.
///
/// ```rust
/// use pegloom::grammars::arithmetic;
/// use pegloom::Value;
///
/// let calc = arithmetic().unwrap();
/// assert_eq!(calc.parse("2 * (3 + 4) - -1").unwrap(), Value::Number(15.0));
/// ```
pub fn arithmetic() -> Result<Parser, GrammarError> {
    let ws = Parser::regex(WHITESPACE)?;
    let tok = |p: Parser| token(p, &ws);
    let punct = |text: &str| tok(Parser::raw(text));

    let number = tok(Parser::regex(NUMBER)?.map(|text| {
        text.as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .map_or(Value::Nil, Value::Number)
    }));
    let additive = punct("+").or(punct("-"));
    let multiplicative = punct("*").or(punct("/"));
    let (open, close, minus) = (punct("("), punct(")"), punct("-"));

    let expr = Parser::recursive("expr", |expr| {
        let factor = Parser::recursive("factor", |factor| {
            Parser::choice([
                number,
                seq![open, CUT, expr, close].map_items(nth(1)),
                seq![minus, CUT, factor]
                    .map_items(nth(1))
                    .map(|v| v.as_number().map_or(Value::Nil, |n| Value::Number(-n))),
            ])
        });
        let term = chain("term", factor, multiplicative);
        chain("sum", term, additive)
    });

    Ok(seq![ws.clone(), expr].map_items(nth(1)))
}

/// `operand (operator operand)*`, folded left to right.
///
/// The repetition accumulates `op` and `rhs` as parallel lists, which the
/// fold walks pairwise.
fn chain(label: &str, operand: Parser, operator: Parser) -> Parser {
    let body = seq![
        operand.clone().bind("first"),
        seq![operator.bind("op"), CUT, operand.bind("rhs")].repeat(),
    ]
    .bound(fold);
    Parser::lazy(label, move || body.clone())
}

fn fold(bindings: &Bindings) -> Value {
    let Some(mut acc) = bindings.get("first").and_then(Value::as_number) else {
        return Value::Nil;
    };
    let list = |name: &str| {
        bindings
            .get(name)
            .and_then(Value::as_list)
            .map(<[Value]>::to_vec)
            .unwrap_or_default()
    };
    let (ops, operands) = (list("op"), list("rhs"));
    for (op, rhs) in ops.iter().zip(operands) {
        let Some(rhs) = rhs.as_number() else {
            return Value::Nil;
        };
        acc = match op.as_str() {
            Some("+") => acc + rhs,
            Some("-") => acc - rhs,
            Some("*") => acc * rhs,
            Some("/") => acc / rhs,
            _ => return Value::Nil,
        };
    }
    Value::Number(acc)
}
