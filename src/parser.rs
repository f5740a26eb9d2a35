//! Parser values and the combinator construction API.
//!
//! A grammar is a tree of [`Parser`] handles built once and reused for any
//! number of parses. Building is pure value construction; nothing runs
//! until one of the entry points ([`Parser::parse`], [`Parser::parse_string`],
//! [`Parser::parse_partial`], [`Parser::parse_input`]) is called.
//!
//! ```rust
//! use pegloom::prelude::*;
//!
//! let greeting = seq![
//!     Parser::raw("hello").bind("word"),
//!     Parser::raw(" "),
//!     Parser::regex("[a-z]+").unwrap().bind("name"),
//! ]
//! .bound(|b| {
//!     let name = b.get("name").and_then(Value::as_str).unwrap_or_default();
//!     Value::from(format!("{}!", name))
//! });
//!
//! assert_eq!(greeting.parse("hello world").unwrap(), Value::from("world!"));
//! ```

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::config::ParseConfig;
use crate::engine::ParseContext;
use crate::errors::{GrammarError, ParseError};
use crate::input::Input;
use crate::outcome::{Bindings, ParseResult};
use crate::value::Value;

pub(crate) mod combinators;
pub(crate) mod lazy;
mod ops;
pub(crate) mod primitives;
pub(crate) mod repetition;
pub(crate) mod transform;

pub use lazy::Rule;

/// Output mapping used by [`ParserKind::Transform`].
pub type TransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Semantic action used by [`ParserKind::TransformBound`]; receives the
/// bindings collected by the child, keyed by name.
pub type BoundFn = Arc<dyn Fn(&Bindings) -> Value + Send + Sync>;

// ============================================================================
// PARSER TYPES
// ============================================================================

/// A shareable handle to a node of a grammar.
///
/// Cloning is cheap and yields the same node. Two handles compare equal only
/// when they refer to the same node.
#[derive(Clone)]
pub struct Parser(Arc<ParserKind>);

/// The parser variants.
pub enum ParserKind {
    /// Fails if the child leaves input unconsumed.
    Full(Parser),
    /// Exact-prefix match.
    Raw(String),
    /// Regex match anchored at the cursor.
    Regex(Pattern),
    /// Sequential match; a [`Step::Cut`] commits the sequence.
    Seq(Vec<Step>),
    /// Ordered choice.
    Or(Vec<Parser>),
    /// Every child must match the same input; yields the first child's result.
    And(Vec<Parser>),
    /// Negative lookahead.
    Not(Parser),
    /// Zero or more.
    Rep(Parser),
    /// Exactly `n`.
    RepN(Parser, usize),
    Transform(Parser, TransformFn),
    TransformBound(Parser, BoundFn),
    /// Captures the child's output under a name.
    Binder(Parser, String),
    /// Deferred construction, for recursive grammars.
    Lazy(Rule),
    Succeed(Value),
    Fail,
}

/// One element of a sequence: either a parser or the cut marker.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Parse(Parser),
    Cut,
}

/// The cut marker. Once a sequence passes it, a later failure in that
/// sequence is fatal and no enclosing alternative is tried.
pub const CUT: Step = Step::Cut;

impl From<Parser> for Step {
    fn from(parser: Parser) -> Self {
        Step::Parse(parser)
    }
}

impl From<&Parser> for Step {
    fn from(parser: &Parser) -> Self {
        Step::Parse(parser.clone())
    }
}

/// A compiled regex, anchored at the cursor.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, GrammarError> {
        let regex = Regex::new(&format!("^(?:{})", source)).map_err(|source_err| {
            GrammarError::InvalidRegex {
                pattern: source.to_string(),
                source: source_err,
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as written, without the anchor.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Length in bytes of the match at the start of `text`, if any.
    pub(crate) fn match_len(&self, text: &str) -> Option<usize> {
        self.regex.find(text).map(|m| m.end())
    }
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl Parser {
    pub fn from_kind(kind: ParserKind) -> Self {
        Self(Arc::new(kind))
    }

    pub fn kind(&self) -> &ParserKind {
        &self.0
    }

    /// True if both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Parser) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn full(parser: Parser) -> Self {
        Self::from_kind(ParserKind::Full(parser))
    }

    pub fn raw(literal: impl Into<String>) -> Self {
        Self::from_kind(ParserKind::Raw(literal.into()))
    }

    /// A regex leaf. The pattern is matched at the cursor only, never searched.
    pub fn regex(pattern: &str) -> Result<Self, GrammarError> {
        Ok(Self::from_kind(ParserKind::Regex(Pattern::new(pattern)?)))
    }

    pub fn seq<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Step>,
    {
        Self::from_kind(ParserKind::Seq(steps.into_iter().map(Into::into).collect()))
    }

    /// Ordered choice between `children`.
    pub fn choice(children: impl IntoIterator<Item = Parser>) -> Self {
        Self::from_kind(ParserKind::Or(children.into_iter().collect()))
    }

    /// Conjunction: every child must match at the same position.
    pub fn all(children: impl IntoIterator<Item = Parser>) -> Self {
        Self::from_kind(ParserKind::And(children.into_iter().collect()))
    }

    /// Negative lookahead.
    pub fn negate(parser: Parser) -> Self {
        Self::from_kind(ParserKind::Not(parser))
    }

    pub fn rep(parser: Parser) -> Self {
        Self::from_kind(ParserKind::Rep(parser))
    }

    pub fn rep_n(parser: Parser, n: usize) -> Self {
        Self::from_kind(ParserKind::RepN(parser, n))
    }

    pub fn transform<F>(parser: Parser, func: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::from_kind(ParserKind::Transform(parser, Arc::new(func)))
    }

    pub fn transform_bound<F>(parser: Parser, func: F) -> Self
    where
        F: Fn(&Bindings) -> Value + Send + Sync + 'static,
    {
        Self::from_kind(ParserKind::TransformBound(parser, Arc::new(func)))
    }

    pub fn binder(parser: Parser, name: impl Into<String>) -> Self {
        Self::from_kind(ParserKind::Binder(parser, name.into()))
    }

    /// A rule whose body is built on first use.
    ///
    /// The thunk may refer to rules that are defined later, or to the
    /// function that builds this rule, which is what makes mutually
    /// recursive grammars expressible without a declaration pass.
    pub fn lazy<F>(label: impl Into<String>, thunk: F) -> Self
    where
        F: Fn() -> Parser + Send + Sync + 'static,
    {
        Self::from_kind(ParserKind::Lazy(Rule::deferred(label.into(), thunk)))
    }

    /// A self-referential rule. `build` receives a handle to the rule being
    /// defined and returns its body.
    ///
    /// ```rust
    /// use pegloom::prelude::*;
    ///
    /// let parens = Parser::recursive("parens", |parens| {
    ///     seq![Parser::raw("("), parens, Parser::raw(")")].or(Parser::raw(""))
    /// });
    /// assert!(parens.parse("(())").is_ok());
    /// assert!(parens.parse("(()").is_err());
    /// ```
    pub fn recursive<F>(label: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(Parser) -> Parser,
    {
        Self::from_kind(ParserKind::Lazy(Rule::recursive(label.into(), build)))
    }

    pub fn succeed(value: impl Into<Value>) -> Self {
        Self::from_kind(ParserKind::Succeed(value.into()))
    }

    pub fn fail() -> Self {
        Self::from_kind(ParserKind::Fail)
    }

    // ------------------------------------------------------------------------
    // Builder methods
    // ------------------------------------------------------------------------

    /// `self` or else `other`. Chained calls extend a single choice.
    pub fn or(self, other: Parser) -> Parser {
        match self.kind() {
            ParserKind::Or(children) => {
                let mut children = children.clone();
                children.push(other);
                Parser::choice(children)
            }
            _ => Parser::choice([self, other]),
        }
    }

    /// `self` and `other` both match here; yields `self`'s result.
    pub fn and(self, other: Parser) -> Parser {
        Parser::all([self, other])
    }

    /// Zero or more repetitions.
    pub fn repeat(self) -> Parser {
        Parser::rep(self)
    }

    /// One or more repetitions. Yields the list of outputs.
    pub fn repeat1(self) -> Parser {
        Parser::all([Parser::rep(self.clone()), self])
    }

    /// Matches `self` or nothing.
    pub fn opt(self) -> Parser {
        Parser::choice([self, Parser::raw("")])
    }

    /// Exactly `n` repetitions.
    pub fn times(self, n: usize) -> Parser {
        Parser::rep_n(self, n)
    }

    pub fn map<F>(self, func: F) -> Parser
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Parser::transform(self, func)
    }

    /// Maps the items of a list output, e.g. the results of a sequence.
    /// A non-list output is passed as a single item.
    pub fn map_items<F>(self, func: F) -> Parser
    where
        F: Fn(Vec<Value>) -> Value + Send + Sync + 'static,
    {
        Parser::transform(self, move |output| match output {
            Value::List(items) => func(items),
            other => func(vec![other]),
        })
    }

    /// Replaces the output with `func(bindings)` and clears the bindings.
    pub fn bound<F>(self, func: F) -> Parser
    where
        F: Fn(&Bindings) -> Value + Send + Sync + 'static,
    {
        Parser::transform_bound(self, func)
    }

    /// Captures the output under `name`.
    pub fn bind(self, name: impl Into<String>) -> Parser {
        Parser::binder(self, name)
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// The label this frame contributes to a failure trace.
    pub fn trace_name(&self) -> Option<&str> {
        match self.kind() {
            ParserKind::Lazy(rule) => Some(rule.label()),
            _ => None,
        }
    }

    /// A short human description of what this parser matches.
    pub fn describe(&self) -> String {
        match self.kind() {
            ParserKind::Full(_) => "end of input".into(),
            ParserKind::Raw(literal) => format!("{:?}", literal),
            ParserKind::Regex(pattern) => format!("/{}/", pattern.as_str()),
            ParserKind::Seq(steps) => steps
                .iter()
                .find_map(|step| match step {
                    Step::Parse(child) => Some(child.describe()),
                    Step::Cut => None,
                })
                .unwrap_or_else(|| "nothing".into()),
            ParserKind::Or(children) => children
                .iter()
                .map(Parser::describe)
                .collect::<Vec<_>>()
                .join(" or "),
            ParserKind::And(children) => children
                .first()
                .map_or_else(|| "nothing".into(), Parser::describe),
            ParserKind::Not(child) => format!("anything but {}", child.describe()),
            ParserKind::Rep(child) => format!("any number of {}", child.describe()),
            ParserKind::RepN(child, n) => format!("{} x {}", child.describe(), n),
            ParserKind::Transform(child, _) | ParserKind::TransformBound(child, _) => {
                child.describe()
            }
            ParserKind::Binder(child, name) => format!("{} as `{}`", child.describe(), name),
            ParserKind::Lazy(rule) => format!("<{}>", rule.label()),
            ParserKind::Succeed(_) => "nothing".into(),
            ParserKind::Fail => "nothing (always fails)".into(),
        }
    }

    fn variant_name(&self) -> &'static str {
        match self.kind() {
            ParserKind::Full(_) => "Full",
            ParserKind::Raw(_) => "Raw",
            ParserKind::Regex(_) => "Regex",
            ParserKind::Seq(_) => "Seq",
            ParserKind::Or(_) => "Or",
            ParserKind::And(_) => "And",
            ParserKind::Not(_) => "Not",
            ParserKind::Rep(_) => "Rep",
            ParserKind::RepN(..) => "RepN",
            ParserKind::Transform(..) => "Transform",
            ParserKind::TransformBound(..) => "TransformBound",
            ParserKind::Binder(..) => "Binder",
            ParserKind::Lazy(_) => "Lazy",
            ParserKind::Succeed(_) => "Succeed",
            ParserKind::Fail => "Fail",
        }
    }

    // ------------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------------

    /// Runs this parser at `input` with the default configuration.
    pub fn parse_input(&self, input: Input) -> ParseResult {
        self.parse_input_with(input, &ParseConfig::default())
    }

    pub fn parse_input_with(&self, input: Input, config: &ParseConfig) -> ParseResult {
        ParseContext::new(config).run(self, input)
    }

    /// Runs from the start of `text`; trailing input is allowed.
    pub fn parse_partial(&self, text: &str) -> ParseResult {
        self.parse_partial_with(text, &ParseConfig::default())
    }

    pub fn parse_partial_with(&self, text: &str, config: &ParseConfig) -> ParseResult {
        let result = self.parse_input_with(Input::start(text), config);
        log_outcome("parse_partial", &result);
        result
    }

    /// Runs from the start of `text`; all of it must be consumed.
    pub fn parse_string(&self, text: &str) -> ParseResult {
        self.parse_string_with(text, &ParseConfig::default())
    }

    pub fn parse_string_with(&self, text: &str, config: &ParseConfig) -> ParseResult {
        let result = Parser::full(self.clone()).parse_input_with(Input::start(text), config);
        log_outcome("parse_string", &result);
        result
    }

    /// Parses all of `text`, returning the output value or a located error.
    pub fn parse(&self, text: &str) -> Result<Value, ParseError> {
        self.parse_with(text, &ParseConfig::default())
    }

    pub fn parse_with(&self, text: &str, config: &ParseConfig) -> Result<Value, ParseError> {
        self.parse_string_with(text, config)
            .map(|success| success.output)
            .map_err(ParseError::new)
    }
}

fn log_outcome(entry: &str, result: &ParseResult) {
    match result {
        Ok(success) => debug!(entry, index = success.index(), "parse succeeded"),
        Err(failure) => debug!(
            entry,
            index = failure.index(),
            fatal = failure.fatal,
            reason = ?failure.reason,
            "parse failed"
        ),
    }
}

impl PartialEq for Parser {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.variant_name(), self.describe())
    }
}

/// Builds a [`Parser::seq`] from parsers and [`CUT`] markers.
///
/// ```rust
/// use pegloom::prelude::*;
///
/// let call = seq![Parser::raw("f"), CUT, Parser::raw("()")];
/// assert!(call.parse("f()").is_ok());
/// ```
#[macro_export]
macro_rules! seq {
    ($($step:expr),* $(,)?) => {
        $crate::parser::Parser::seq(::std::vec![$($crate::parser::Step::from($step)),*])
    };
}
