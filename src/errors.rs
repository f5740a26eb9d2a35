//! pegloom error types.
//!
//! Failures are plain data while a parse is running. They only become a
//! [`ParseError`] at the `parse` entry point, where the terminal [`Failure`] is
//! located in the source text and rendered. Grammar construction problems are
//! reported separately as [`GrammarError`].

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::input::floor_char_boundary;
use crate::outcome::{Failure, FailureReason};

/// Characters of context kept to the left of the failure column.
const CONTEXT_BEFORE: usize = 40;
/// Width of the source excerpt window.
const EXCERPT_WIDTH: usize = 60;

// ============================================================================
// LOCATION
// ============================================================================

/// Where a failure sits in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Byte offset into the text.
    pub index: usize,
    /// 1-based line number.
    pub line: usize,
    /// 0-based column, counted in characters from the start of the line.
    pub column: usize,
    /// Slice of the failing line around the column.
    pub excerpt: String,
    /// Display width of the excerpt to the left of the failure point.
    pub caret_offset: usize,
}

impl Location {
    /// Locates byte offset `index` within `text`.
    pub fn locate(text: &str, index: usize) -> Self {
        let index = floor_char_boundary(text, index);
        let before = &text[..index];

        let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
        let line_end = text[index..]
            .find('\n')
            .map_or(text.len(), |nl| index + nl);
        let line = before.matches('\n').count() + 1;
        let column = text[line_start..index].chars().count();

        let lead = column.min(CONTEXT_BEFORE);
        let first = column - lead;
        let excerpt: String = text[line_start..line_end]
            .chars()
            .skip(first)
            .take(EXCERPT_WIDTH)
            .collect();
        let prefix: String = excerpt.chars().take(lead).collect();

        Self {
            index,
            line,
            column,
            caret_offset: prefix.width(),
            excerpt,
        }
    }

    /// The caret line drawn under the excerpt.
    pub fn caret(&self) -> String {
        format!("{}^", " ".repeat(self.caret_offset))
    }
}

// ============================================================================
// PARSE ERROR
// ============================================================================

/// A parse that failed at the top level.
///
/// Carries the full [`Failure`] so callers can inspect `index` and `trace`,
/// plus the rendered location. `Display` gives the plain text rendering;
/// the [`Diagnostic`] impl lets `miette` draw a labelled source snippet.
#[derive(Debug)]
pub struct ParseError {
    failure: Failure,
    location: Location,
    source_code: Arc<NamedSource<String>>,
}

impl ParseError {
    pub fn new(failure: Failure) -> Self {
        Self::with_source_name(failure, "input")
    }

    /// Like [`ParseError::new`], naming the source (e.g. a file path) for reports.
    pub fn with_source_name(failure: Failure, name: impl AsRef<str>) -> Self {
        let text = failure.remaining_input.text();
        let location = Location::locate(text, failure.index());
        let source_code = Arc::new(NamedSource::new(name, text.to_string()));
        Self {
            failure,
            location,
            source_code,
        }
    }

    pub fn failure(&self) -> &Failure {
        &self.failure
    }

    pub fn into_failure(self) -> Failure {
        self.failure
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn index(&self) -> usize {
        self.failure.index()
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }

    pub fn trace(&self) -> Vec<String> {
        self.failure.trace()
    }

    pub fn is_fatal(&self) -> bool {
        self.failure.fatal
    }

    fn code_suffix(&self) -> &'static str {
        match self.failure.reason {
            FailureReason::TrailingInput => "trailing",
            FailureReason::DepthExceeded => "depth",
            FailureReason::UnresolvedRule => "unresolved",
            FailureReason::Mismatch if self.failure.fatal => "fatal",
            FailureReason::Mismatch => "mismatch",
        }
    }

    fn primary_label(&self) -> String {
        match self.failure.reason {
            FailureReason::TrailingInput => "unconsumed input starts here".into(),
            FailureReason::DepthExceeded => "nesting limit reached here".into(),
            FailureReason::UnresolvedRule => "rule was dropped".into(),
            FailureReason::Mismatch => match self.failure.expected() {
                Some(expected) => format!("expected {}", expected),
                None => "failed here".into(),
            },
        }
    }
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc = &self.location;
        writeln!(
            f,
            "index: {}, line: {}, col: {}",
            loc.index, loc.line, loc.column
        )?;
        writeln!(f, "{}", self.trace().join(" / "))?;
        writeln!(f, "{}", loc.excerpt)?;
        write!(f, "{}", loc.caret())
    }
}

impl Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("pegloom::parse::{}", self.code_suffix())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.failure.reason != FailureReason::Mismatch {
            return None;
        }
        self.failure
            .expected()
            .map(|expected| Box::new(format!("expected {}", expected)) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&*self.source_code)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let text = self.failure.remaining_input.text();
        let start = self.location.index;
        let len = text[start..].chars().next().map_or(0, char::len_utf8);
        let labels = vec![LabeledSpan::new(Some(self.primary_label()), start, len)];
        Some(Box::new(labels.into_iter()))
    }
}

// ============================================================================
// GRAMMAR ERROR
// ============================================================================

/// Problems found while building a grammar.
#[derive(Debug, Error, Diagnostic)]
pub enum GrammarError {
    #[error("invalid regex pattern `{pattern}`")]
    #[diagnostic(
        code(pegloom::grammar::regex),
        help("patterns use the syntax of the `regex` crate and are anchored at the cursor")
    )]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
