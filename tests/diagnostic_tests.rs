// tests/diagnostic_tests.rs
//
// Located errors produced by `Parser::parse` and their miette rendering.

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use pegloom::prelude::*;

fn render(err: &ParseError) -> String {
    let mut out = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .render_report(&mut out, err)
        .unwrap();
    out
}

fn word(label: &str, text: &'static str) -> Parser {
    Parser::lazy(label, move || Parser::raw(text))
}

#[test]
fn failure_on_the_second_line() {
    let grammar = seq![word("head", "abc\nd"), CUT, word("tail", "ef")];
    let err = grammar.parse("abc\ndXf").unwrap_err();
    assert_eq!(err.index(), 5);
    assert_eq!((err.line(), err.column()), (2, 1));
    assert_eq!(err.to_string(), "index: 5, line: 2, col: 1\ntail\ndXf\n ^");
}

#[test]
fn failure_on_the_first_line() {
    let grammar = seq![Parser::raw("abcde"), Parser::raw("!")];
    let err = grammar.parse("abcdefgh\nij").unwrap_err();
    assert_eq!(err.index(), 5);
    assert_eq!((err.line(), err.column()), (1, 5));
    assert_eq!(err.location().excerpt, "abcdefgh");
}

#[test]
fn trace_lists_rules_outermost_first() {
    let inner = word("digit", "1");
    let middle = Parser::lazy("pair", move || seq![inner.clone(), CUT, inner.clone()]);
    let outer = Parser::lazy("list", move || seq![Parser::raw("["), middle.clone()]);
    let err = outer.parse("[12").unwrap_err();
    assert_eq!(err.trace(), vec!["list", "pair", "digit"]);
    assert!(err.to_string().contains("list / pair / digit"));
}

#[test]
fn columns_count_characters_not_bytes() {
    let grammar = seq![Parser::raw("héllo "), Parser::raw("world")];
    let err = grammar.parse("héllo there").unwrap_err();
    assert_eq!(err.index(), "héllo ".len());
    assert_eq!(err.column(), 6);
}

#[test]
fn trailing_input_has_its_own_code() {
    let err = Parser::raw("a").parse("ab").unwrap_err();
    assert_eq!(err.failure().reason, FailureReason::TrailingInput);
    let code = err.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("pegloom::parse::trailing"));
    assert!(err.help().is_none());
}

#[test]
fn fatal_and_mismatch_codes_differ() {
    let committed = seq![Parser::raw("a"), CUT, Parser::raw("b")];
    let fatal = committed.parse("ac").unwrap_err();
    let plain = Parser::raw("b").parse("c").unwrap_err();
    assert_eq!(
        fatal.code().map(|c| c.to_string()).as_deref(),
        Some("pegloom::parse::fatal")
    );
    assert_eq!(
        plain.code().map(|c| c.to_string()).as_deref(),
        Some("pegloom::parse::mismatch")
    );
}

#[test]
fn report_shows_source_label_and_help() {
    let grammar = seq![Parser::raw("let "), CUT, Parser::regex("[a-z]+").unwrap()];
    let err = grammar.parse("let 42").unwrap_err();
    let report = render(&err);
    assert!(report.contains("let 42"), "{}", report);
    assert!(report.contains("expected /[a-z]+/"), "{}", report);
    assert!(report.contains("pegloom::parse::fatal"), "{}", report);
}

#[test]
fn failure_survives_conversion() {
    let err = Parser::raw("x").parse("y").unwrap_err();
    let failure = err.into_failure();
    assert_eq!(failure.index(), 0);
    assert_eq!(failure.expected().as_deref(), Some("\"x\""));
}
