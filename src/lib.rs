//! pegloom: a Parsing Expression Grammar combinator engine.
//!
//! Grammars are trees of [`Parser`] values built from literals, regexes and
//! combinators (sequence, ordered choice, lookahead, repetition, transforms,
//! named bindings and lazily-built recursive rules). Running a grammar is a
//! single-threaded recursive descent with backtracking, where a [`CUT`] inside
//! a sequence commits to it and turns later failures fatal.
//!
//! ```rust
//! use pegloom::prelude::*;
//!
//! let grammar = Parser::choice([
//!     seq![Parser::raw("a"), CUT, Parser::raw("b")],
//!     Parser::raw("ac"),
//! ]);
//! assert!(grammar.parse("ab").is_ok());
//!
//! let err = grammar.parse("ac").unwrap_err();
//! assert!(err.is_fatal());
//! assert_eq!((err.index(), err.line(), err.column()), (1, 1, 1));
//! ```

pub use crate::config::ParseConfig;
pub use crate::errors::{GrammarError, Location, ParseError};
pub use crate::input::Input;
pub use crate::outcome::{Bindings, Failure, FailureReason, ParseResult, Success};
pub use crate::parser::{Parser, ParserKind, Step, CUT};
pub use crate::value::Value;

pub mod cli;
pub mod config;
mod engine;
pub mod errors;
pub mod grammars;
pub mod input;
pub mod outcome;
pub mod parser;
pub mod value;

pub mod prelude {
    pub use crate::config::ParseConfig;
    pub use crate::errors::{GrammarError, Location, ParseError};
    pub use crate::input::Input;
    pub use crate::outcome::{Bindings, Failure, FailureReason, ParseResult, Success};
    pub use crate::parser::{Parser, ParserKind, Rule, Step, CUT};
    pub use crate::seq;
    pub use crate::value::Value;
}
