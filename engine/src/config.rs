/// Default limit on tree nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default limit on `(`/`[` nesting inside one expression.
/// Each bracket costs a full pass through the parser's precedence levels,
/// so this stays well below what a 2 MiB thread stack can take.
pub const DEFAULT_MAX_EXPR_NESTING: usize = 24;

/// Behaviour knobs for a [`crate::Resolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Deepest node nesting accepted while decoding or resolving a tree.
    /// Deeper trees fail with [`crate::Error::DepthExceeded`].
    pub max_depth: usize,
    /// Deepest bracket nesting accepted in expression text.
    /// Deeper expressions fail with [`crate::Error::DepthExceeded`] before parsing.
    pub max_expr_nesting: usize,
    /// All-digit path segments are always tried as a list index first.
    /// When this is set, a segment that lands on a mapping is retried as a key,
    /// so `"a.0"` can reach `{"a": {"0": ..}}`.
    pub numeric_key_fallback: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_expr_nesting: DEFAULT_MAX_EXPR_NESTING,
            numeric_key_fallback: false,
        }
    }
}
