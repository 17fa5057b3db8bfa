//! Closed registry of the tree-sitter-python node kinds the classifier
//! dispatches on.
//!
//! Every kind the classification table cares about gets a variant; everything
//! else collapses to [`NodeKind::Other`], which only recurses. Keeping the
//! set closed means a forgotten construct is a compile-time hole in the
//! visitor's `match`, not a silent runtime skip.

use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Scope-creating definitions
    ClassDefinition,
    FunctionDefinition,
    Lambda,

    // Assignments (annotated assignments share the `assignment` kind)
    Assignment,

    // Block statements
    ForStatement,
    WhileStatement,
    IfStatement,
    ElifClause,
    WithStatement,
    TryStatement,
    ExceptClause,
    FinallyClause,

    // Comprehension expressions and their binding clause
    Comprehension,
    ForInClause,

    // Structural pattern matching
    MatchStatement,
    CaseClause,

    // Imports
    ImportStatement,
    ImportFromStatement,

    // Everything else: no bindings of its own, children still visited
    Other,
}

impl NodeKind {
    /// Map a raw tree-sitter kind string onto the closed set.
    ///
    /// `async def` / `async for` / `async with` reuse the sync node kinds in
    /// tree-sitter-python (the `async` keyword is a plain child token), so
    /// they need no variants of their own. `except*` groups route through
    /// [`NodeKind::ExceptClause`] the same way CPython routes both through
    /// `ExceptHandler`.
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "class_definition" => NodeKind::ClassDefinition,
            "function_definition" => NodeKind::FunctionDefinition,
            "lambda" => NodeKind::Lambda,
            "assignment" => NodeKind::Assignment,
            "for_statement" => NodeKind::ForStatement,
            "while_statement" => NodeKind::WhileStatement,
            "if_statement" => NodeKind::IfStatement,
            "elif_clause" => NodeKind::ElifClause,
            "with_statement" => NodeKind::WithStatement,
            "try_statement" => NodeKind::TryStatement,
            "except_clause" | "except_group_clause" => NodeKind::ExceptClause,
            "finally_clause" => NodeKind::FinallyClause,
            "list_comprehension"
            | "set_comprehension"
            | "dictionary_comprehension"
            | "generator_expression" => NodeKind::Comprehension,
            "for_in_clause" => NodeKind::ForInClause,
            "match_statement" => NodeKind::MatchStatement,
            "case_clause" => NodeKind::CaseClause,
            "import_statement" => NodeKind::ImportStatement,
            "import_from_statement" | "future_import_statement" => NodeKind::ImportFromStatement,
            _ => NodeKind::Other,
        }
    }

    pub fn of(node: &Node) -> Self {
        Self::from_kind(node.kind())
    }
}
