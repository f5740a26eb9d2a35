//! JSON.
//!
//! Objects become `Value::Map`, arrays `Value::List`, and `null` becomes
//! `Value::Nil`. Every bracket, comma, colon and opening quote is followed by
//! a cut, so malformed input is reported where it goes wrong rather than at
//! the start of the enclosing value.

use im::HashMap;

use crate::errors::GrammarError;
use crate::grammars::{nth, token};
use crate::parser::{Parser, CUT};
use crate::seq;
use crate::value::Value;

const WHITESPACE: &str = r"[ \t\r\n]*";
const NUMBER: &str = r"-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?";
const STRING_BODY: &str = r#"(?:[^"\\\x00-\x1f]|\\(?:["\\/bfnrt]|u[0-9a-fA-F]{4}))*"#;

/// A grammar for a complete JSON document.
///
/// ```rust
/// use pegloom::grammars::json;
/// use pegloom::Value;
///
/// let grammar = json().unwrap();
/// let doc = grammar.parse(r#"{"xs": [1, 2.5, true, null]}"#).unwrap();
/// let xs = doc.as_map().and_then(|m| m.get("xs")).cloned();
/// assert_eq!(
///     xs,
///     Some(Value::List(vec![1.0.into(), 2.5.into(), true.into(), Value::Nil]))
/// );
/// ```
pub fn json() -> Result<Parser, GrammarError> {
    let ws = Parser::regex(WHITESPACE)?;
    let tok = |p: Parser| token(p, &ws);
    let punct = |text: &str| tok(Parser::raw(text));

    let number = tok(Parser::regex(NUMBER)?.map(|text| {
        text.as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .map_or(Value::Nil, Value::Number)
    }));
    let string = tok(seq![
        Parser::raw("\""),
        CUT,
        Parser::regex(STRING_BODY)?,
        Parser::raw("\""),
    ]
    .map_items(nth(1))
    .map(|body| Value::String(unescape(body.as_str().unwrap_or_default()))));

    let literal = |text: &str, value: Value| tok(Parser::raw(text).map(move |_| value.clone()));
    let keywords = Parser::choice([
        literal("true", Value::Bool(true)),
        literal("false", Value::Bool(false)),
        literal("null", Value::Nil),
    ]);

    let (comma, colon) = (punct(","), punct(":"));
    let (open_bracket, close_bracket) = (punct("["), punct("]"));
    let (open_brace, close_brace) = (punct("{"), punct("}"));

    let value = Parser::recursive("value", |value| {
        let elements = seq![
            value.clone().bind("head"),
            seq![comma.clone(), CUT, value.clone()]
                .map_items(nth(1))
                .repeat()
                .bind("tail"),
        ]
        .bound(|b| prepend(b.get("head"), b.get("tail")))
        .or(Parser::succeed(Value::List(Vec::new())));
        let array = Parser::lazy("array", move || {
            seq![open_bracket.clone(), CUT, elements.clone(), close_bracket.clone()]
                .map_items(nth(1))
        });

        let pair = Parser::lazy("pair", {
            let (string, value) = (string.clone(), value.clone());
            move || {
                seq![
                    string.clone().bind("key"),
                    CUT,
                    colon.clone(),
                    value.clone().bind("value"),
                ]
                .bound(|b| {
                    Value::List(vec![
                        b.get("key").cloned().unwrap_or_default(),
                        b.get("value").cloned().unwrap_or_default(),
                    ])
                })
            }
        });
        let members = seq![
            pair.clone().bind("head"),
            seq![comma.clone(), CUT, pair].map_items(nth(1)).repeat().bind("tail"),
        ]
        .bound(|b| entries_to_map(prepend(b.get("head"), b.get("tail"))))
        .or(Parser::succeed(Value::Map(HashMap::new())));
        let object = Parser::lazy("object", move || {
            seq![open_brace.clone(), CUT, members.clone(), close_brace.clone()].map_items(nth(1))
        });

        Parser::choice([object, array, string.clone(), number.clone(), keywords.clone()])
    });

    Ok(seq![ws.clone(), value].map_items(nth(1)))
}

fn prepend(head: Option<&Value>, tail: Option<&Value>) -> Value {
    let mut items = Vec::new();
    items.extend(head.cloned());
    if let Some(Value::List(rest)) = tail {
        items.extend(rest.iter().cloned());
    }
    Value::List(items)
}

/// Turns a list of `[key, value]` pairs into a map; later keys win.
fn entries_to_map(entries: Value) -> Value {
    let mut map = HashMap::new();
    for entry in entries.into_list().unwrap_or_default() {
        if let Some([Value::String(key), value]) = entry.as_list() {
            map.insert(key.clone(), value.clone());
        }
    }
    Value::Map(map)
}

/// Resolves JSON escapes in a string body the grammar has already validated.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let unit = read_hex4(&mut chars);
                let code = if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate; combine with a following `\uXXXX` low half.
                    let mut lookahead = chars.clone();
                    match (lookahead.next(), lookahead.next()) {
                        (Some('\\'), Some('u')) => {
                            let low = read_hex4(&mut lookahead);
                            if (0xDC00..0xE000).contains(&low) {
                                chars = lookahead;
                                0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                            } else {
                                unit
                            }
                        }
                        _ => unit,
                    }
                } else {
                    unit
                };
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> u32 {
    chars
        .take(4)
        .fold(0, |acc, c| acc * 16 + c.to_digit(16).unwrap_or(0))
}
