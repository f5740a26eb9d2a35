//! Operator shorthands for grammar construction.
//!
//! | operator | builds |
//! |---|---|
//! | `p \| q` | ordered choice |
//! | `p & q` | conjunction |
//! | `!p`, `-p` | negative lookahead |
//! | `p * n` | exactly `n` repetitions |
//! | `p >> f` | bound transform |

use std::ops::{BitAnd, BitOr, Mul, Neg, Not, Shr};

use crate::outcome::Bindings;
use crate::parser::Parser;
use crate::value::Value;

impl BitOr for Parser {
    type Output = Parser;

    fn bitor(self, rhs: Parser) -> Parser {
        self.or(rhs)
    }
}

impl BitAnd for Parser {
    type Output = Parser;

    fn bitand(self, rhs: Parser) -> Parser {
        self.and(rhs)
    }
}

impl Not for Parser {
    type Output = Parser;

    fn not(self) -> Parser {
        Parser::negate(self)
    }
}

impl Neg for Parser {
    type Output = Parser;

    fn neg(self) -> Parser {
        Parser::negate(self)
    }
}

impl Mul<usize> for Parser {
    type Output = Parser;

    fn mul(self, n: usize) -> Parser {
        Parser::rep_n(self, n)
    }
}

impl<F> Shr<F> for Parser
where
    F: Fn(&Bindings) -> Value + Send + Sync + 'static,
{
    type Output = Parser;

    fn shr(self, func: F) -> Parser {
        Parser::transform_bound(self, func)
    }
}
