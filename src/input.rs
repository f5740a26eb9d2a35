//! The immutable cursor parsers consume.

use std::fmt;
use std::sync::Arc;

/// A position within the text being parsed.
///
/// The text is shared between every copy of the cursor; advancing produces a
/// new `Input` rather than mutating this one. `index` is a byte offset and
/// always lies on a `char` boundary: offsets passed in from outside are
/// rounded down to one, and parsers only advance by the length of text they
/// actually matched.
#[derive(Clone, PartialEq, Eq)]
pub struct Input {
    text: Arc<str>,
    index: usize,
}

impl Input {
    /// Creates a cursor at `index`, clamped to the end of `text` and rounded
    /// down to the start of the character it falls in.
    pub fn new(text: impl Into<Arc<str>>, index: usize) -> Self {
        let text = text.into();
        let index = floor_char_boundary(&text, index);
        Self { text, index }
    }

    /// A cursor at the start of `text`.
    pub fn start(text: impl Into<Arc<str>>) -> Self {
        Self::new(text, 0)
    }

    /// Returns a cursor over the same text at a different offset, adjusted
    /// the same way as in [`Input::new`].
    pub fn copy(&self, index: usize) -> Self {
        Self {
            text: Arc::clone(&self.text),
            index: floor_char_boundary(&self.text, index),
        }
    }

    /// Returns a cursor advanced by `len` bytes.
    pub fn advance(&self, len: usize) -> Self {
        self.copy(self.index + len)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The unconsumed tail of the text.
    pub fn rest(&self) -> &str {
        &self.text[self.index..]
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.text.len()
    }
}

/// The largest `char` boundary in `text` at or below `index`.
pub(crate) fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The full text is rarely useful in test output; show what is left.
        let rest: String = self.rest().chars().take(20).collect();
        f.debug_struct("Input")
            .field("index", &self.index)
            .field("rest", &rest)
            .finish()
    }
}
