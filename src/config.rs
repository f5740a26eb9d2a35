/// Default limit on nested parser activations.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Settings that apply to a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Maximum number of parser activations that may be nested at once.
    /// Exceeding it produces a fatal failure instead of overflowing the stack.
    pub max_depth: usize,
}

impl ParseConfig {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::new()
    }
}
