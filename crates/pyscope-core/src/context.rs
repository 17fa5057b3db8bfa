//! The traversal context: where we are at the moment an identifier is bound.

use serde::Serialize;

/// Snapshot of the enclosing constructs at a binding site.
///
/// One flag per construct family, plus two independent nesting counters:
///
/// - `scope_depth` counts ancestors that open a new variable-binding scope
///   (class body, function body, lambda body, comprehension body,
///   except-handler body, match-statement body).
/// - `indent_depth` counts ancestors that open a new block/indentation level
///   (class, function, for, while, if, with, try, finally, except, match).
///
/// Comprehensions and lambdas raise `scope_depth` but not `indent_depth`;
/// they are expressions, not indented blocks. for/while/if/with do the
/// reverse. The visitor maintains both by save-then-restore around each
/// recursive descent, so at any point each counter equals the number of
/// currently-open ancestor frames of its kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraversalContext {
    pub in_function: bool,
    pub in_class: bool,
    pub in_lambda: bool,
    pub in_comprehension: bool,
    pub in_match: bool,
    pub in_for: bool,
    pub in_while: bool,
    pub in_if: bool,
    pub in_with: bool,
    pub in_try: bool,
    pub in_except: bool,
    pub in_finally: bool,
    pub scope_depth: u32,
    pub indent_depth: u32,
}

impl TraversalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no enclosing construct is open (module top level).
    pub fn is_top_level(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_top_level() {
        let ctx = TraversalContext::new();
        assert!(ctx.is_top_level());
        assert_eq!(ctx.scope_depth, 0);
        assert_eq!(ctx.indent_depth, 0);
    }

    #[test]
    fn test_snapshot_is_by_value() {
        let mut ctx = TraversalContext::new();
        let snapshot = ctx;
        ctx.in_function = true;
        ctx.scope_depth += 1;
        assert!(!snapshot.in_function);
        assert_eq!(snapshot.scope_depth, 0);
    }
}
