// tests/parser_tests.rs
//
// Behaviour of the combinators through the public API.

use pegloom::prelude::*;

fn x() -> Parser {
    Parser::raw("x")
}

// ---
// Leaves and entry points
// ---

#[test]
fn literal_match_and_mismatch() {
    let foo = Parser::raw("foo");
    assert_eq!(foo.parse("foo").unwrap(), Value::from("foo"));

    let err = foo.parse("bar").unwrap_err();
    assert_eq!(err.index(), 0);
    assert!(!err.is_fatal());
}

#[test]
fn full_rejects_trailing_input_that_partial_allows() {
    let a = Parser::raw("a");
    let input = Input::new("ab", 0);

    let failure = Parser::full(a.clone()).parse_input(input.clone()).unwrap_err();
    assert_eq!(failure.reason, FailureReason::TrailingInput);
    assert_eq!(failure.index(), 1);

    let success = a.parse_input(input).unwrap();
    assert_eq!(success.index(), 1);
}

#[test]
fn offset_inside_a_multibyte_char_is_rounded_down() {
    let failure = Parser::raw("l")
        .parse_input(Input::new("h\u{e9}llo", 2))
        .unwrap_err();
    assert_eq!(failure.index(), 1);

    let success = Parser::raw("\u{e9}l")
        .parse_input(Input::new("h\u{e9}llo", 2))
        .unwrap();
    assert_eq!(success.index(), 4);
}

#[test]
fn parse_string_wraps_in_full() {
    assert!(Parser::raw("a").parse_string("ab").is_err());
    assert!(Parser::raw("a").parse_partial("ab").is_ok());
}

// ---
// Sequencing and cut
// ---

#[test]
fn sequence_order_and_binding_merge() {
    let grammar = seq![Parser::raw("a").bind("x"), Parser::raw("b").bind("y")];
    let success = grammar.parse_partial("ab").unwrap();
    assert_eq!(success.output, Value::List(vec!["a".into(), "b".into()]));
    assert_eq!(success.bindings.get("x"), Some(&Value::from("a")));
    assert_eq!(success.bindings.get("y"), Some(&Value::from("b")));
}

#[test]
fn cut_is_irrevocable() {
    let grammar = Parser::choice([
        seq![Parser::raw("a"), CUT, Parser::raw("b")],
        Parser::raw("ac"),
    ]);
    let err = grammar.parse("ac").unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.index(), 1);
}

#[test]
fn fatal_failure_escapes_nested_choices() {
    let committed = seq![Parser::raw("let"), CUT, Parser::raw(" "), Parser::raw("x")];
    let grammar = Parser::choice([
        Parser::choice([committed, Parser::raw("letter")]),
        Parser::raw("let y"),
    ]);
    let failure = grammar.parse_partial("let y").unwrap_err();
    assert!(failure.fatal);
    assert_eq!(failure.index(), 4);
}

// ---
// Lookahead
// ---

#[test]
fn and_is_idempotent() {
    let p = Parser::regex("[a-z]+").unwrap();
    for text in ["abc", "12", ""] {
        let input = Input::start(text);
        let single = p.parse_input(input.clone());
        let doubled = Parser::all([p.clone(), p.clone()]).parse_input(input);
        assert_eq!(single.is_ok(), doubled.is_ok(), "input {:?}", text);
        if let (Ok(a), Ok(b)) = (single, doubled) {
            assert_eq!(a.output, b.output);
            assert_eq!(a.index(), b.index());
        }
    }
}

#[test]
fn not_never_consumes() {
    let p = Parser::raw("ab");
    for (text, index) in [("abc", 0), ("xab", 1), ("xyz", 0), ("", 0)] {
        let input = Input::new(text, index);
        match Parser::negate(p.clone()).parse_input(input.clone()) {
            Ok(success) => assert_eq!(success.remaining_input, input),
            Err(failure) => assert_eq!(failure.remaining_input, input),
        }
    }
}

// ---
// Repetition
// ---

#[test]
fn repetition_accepts_zero_matches() {
    let success = Parser::rep(x()).parse_partial("").unwrap();
    assert_eq!(success.output, Value::List(vec![]));
    assert_eq!(success.index(), 0);
}

#[test]
fn rep_n_is_exact() {
    let three = Parser::rep_n(x(), 3);
    assert!(three.parse_partial("xx").is_err());
    let success = three.parse_partial("xxxx").unwrap();
    assert_eq!(success.index(), 3);
}

#[test]
fn repetition_accumulates_bindings_as_lists() {
    let grammar = Parser::rep(seq![Parser::regex("[a-z]").unwrap().bind("c"), Parser::raw(",")]);
    let success = grammar.parse_partial("a,b,c,").unwrap();
    assert_eq!(
        success.bindings.get("c"),
        Some(&Value::List(vec!["a".into(), "b".into(), "c".into()]))
    );
}

#[test]
fn cut_inside_repetition_poisons_it() {
    let item = seq![Parser::raw("("), CUT, Parser::raw("x"), Parser::raw(")")];
    let grammar = Parser::rep(item);
    assert!(grammar.parse_partial("(x)(x)").is_ok());
    let failure = grammar.parse_partial("(x)(y)").unwrap_err();
    assert!(failure.fatal);
    assert_eq!(failure.index(), 4);
}

// ---
// Transforms and recursion
// ---

#[test]
fn bound_transform_sees_accumulated_captures() {
    let word = Parser::regex("[a-z]+").unwrap();
    let entry = seq![word.clone().bind("key"), Parser::raw("="), word.bind("val"), Parser::raw(";")];
    let settings = entry.repeat().bound(|b| {
        let list = |name: &str| b.get(name).and_then(Value::as_list).unwrap_or_default().to_vec();
        let map = list("key")
            .into_iter()
            .zip(list("val"))
            .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v)))
            .collect();
        Value::Map(map)
    });

    let success = settings.parse_partial("a=x;b=y;").unwrap();
    assert!(success.bindings.is_empty());
    let map = success.output.as_map().cloned().unwrap_or_default();
    assert_eq!(map.get("a"), Some(&Value::from("x")));
    assert_eq!(map.get("b"), Some(&Value::from("y")));
}

#[test]
fn lazy_rule_parses_balanced_parentheses() {
    fn parens() -> Parser {
        Parser::lazy("parens", || {
            seq![Parser::raw("("), parens(), Parser::raw(")")].or(Parser::raw(""))
        })
    }
    let grammar = parens();
    assert!(grammar.parse("(())").is_ok());
    assert!(grammar.parse("(()").is_err());
}

#[test]
fn grammars_are_reusable_across_threads() {
    let grammar = Parser::recursive("list", |list| {
        seq![Parser::raw("["), list.repeat(), Parser::raw("]")]
    });
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let grammar = grammar.clone();
            std::thread::spawn(move || {
                let text = format!("[{}]", "[]".repeat(n));
                grammar.parse(&text).is_ok()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn depth_limit_is_fatal_and_configurable() {
    let nested = Parser::recursive("nested", |nested| {
        seq![Parser::raw("("), nested, Parser::raw(")")].or(Parser::raw("x"))
    });
    let text = format!("{}x{}", "(".repeat(50), ")".repeat(50));
    assert!(nested.parse(&text).is_ok());

    let config = ParseConfig::default().with_max_depth(40);
    let err = nested.parse_with(&text, &config).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.failure().reason, FailureReason::DepthExceeded);
}
