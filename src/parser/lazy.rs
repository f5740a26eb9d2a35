//! Deferred rules for recursive grammars.
//!
//! A rule starts out unresolved, holding a thunk, and resolves into its body
//! the first time it is parsed. Resolution happens at most once; racing
//! first uses all observe the same body.

use std::fmt;
use std::sync::{Arc, Weak};

use once_cell::sync::OnceCell;
use tracing::trace;

use crate::engine::ParseContext;
use crate::input::Input;
use crate::outcome::{Failure, FailureReason, ParseResult};
use crate::parser::Parser;

type Thunk = Box<dyn Fn() -> Parser + Send + Sync>;

struct RuleCell {
    thunk: Option<Thunk>,
    body: OnceCell<Parser>,
}

impl RuleCell {
    fn resolve(&self, label: &str) -> Option<Parser> {
        if let Some(body) = self.body.get() {
            return Some(body.clone());
        }
        let thunk = self.thunk.as_ref()?;
        let body = self.body.get_or_init(|| {
            trace!(rule = label, "materializing rule");
            thunk()
        });
        Some(body.clone())
    }
}

/// How a rule handle reaches its cell. Self-references inside a recursive
/// rule's body are weak so the rule does not keep itself alive.
#[derive(Clone)]
enum CellRef {
    Owned(Arc<RuleCell>),
    Back(Weak<RuleCell>),
}

/// A named rule whose body is materialized on demand.
#[derive(Clone)]
pub struct Rule {
    label: Arc<str>,
    cell: CellRef,
}

impl Rule {
    pub(crate) fn deferred<F>(label: String, thunk: F) -> Self
    where
        F: Fn() -> Parser + Send + Sync + 'static,
    {
        let cell = RuleCell {
            thunk: Some(Box::new(thunk)),
            body: OnceCell::new(),
        };
        Self {
            label: label.into(),
            cell: CellRef::Owned(Arc::new(cell)),
        }
    }

    pub(crate) fn recursive<F>(label: String, build: F) -> Self
    where
        F: FnOnce(Parser) -> Parser,
    {
        let label: Arc<str> = label.into();
        let cell = Arc::new_cyclic(|weak: &Weak<RuleCell>| {
            let this = Parser::from_kind(crate::parser::ParserKind::Lazy(Rule {
                label: Arc::clone(&label),
                cell: CellRef::Back(weak.clone()),
            }));
            RuleCell {
                thunk: None,
                body: OnceCell::with_value(build(this)),
            }
        });
        Self {
            label,
            cell: CellRef::Owned(cell),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// True once the body has been built.
    pub fn is_resolved(&self) -> bool {
        match &self.cell {
            CellRef::Owned(cell) => cell.body.get().is_some(),
            CellRef::Back(weak) => weak
                .upgrade()
                .map_or(false, |cell| cell.body.get().is_some()),
        }
    }

    /// The rule body, building it if needed. `None` if this is a
    /// self-reference whose owning rule has been dropped.
    pub fn resolve(&self) -> Option<Parser> {
        match &self.cell {
            CellRef::Owned(cell) => cell.resolve(&self.label),
            CellRef::Back(weak) => weak.upgrade()?.resolve(&self.label),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("label", &self.label)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

pub(crate) fn parse_rule(this: &Parser, rule: &Rule, input: Input, ctx: &mut ParseContext) -> ParseResult {
    let Some(body) = rule.resolve() else {
        let mut failure = Failure::with_reason(input, this.clone(), FailureReason::UnresolvedRule);
        failure.fatal = true;
        return Err(failure);
    };
    ctx.run(&body, input).map_err(|failure| failure.wrap(this))
}
