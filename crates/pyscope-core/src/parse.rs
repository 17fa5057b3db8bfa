//! Parser front door.

use pyscope_error::{Error, Result};
use tree_sitter::{Parser, Tree};

/// Parse Python source into a tree-sitter tree.
///
/// Fails when the grammar cannot be loaded, when the parser bails out, or
/// when the resulting tree contains error nodes. A tree returned from here
/// satisfies the classifier's precondition; the classifier itself performs
/// no parsing and no recovery.
pub fn parse_module(source: &[u8]) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| {
            Error::unexpected("failed to load the python grammar")
                .with_operation("core::parse_module")
                .set_source(e)
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| {
        Error::parse_failed("tree-sitter returned no tree").with_operation("core::parse_module")
    })?;

    if tree.root_node().has_error() {
        return Err(Error::syntax_error("parse tree contains error nodes")
            .with_operation("core::parse_module"));
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyscope_error::ErrorKind;

    #[test]
    fn test_parse_valid_source() {
        let tree = parse_module(b"def foo():\n    pass\n").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_parse_rejects_broken_source() {
        let err = parse_module(b"def foo(:\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SyntaxError);
    }

    #[test]
    fn test_parse_empty_source() {
        let tree = parse_module(b"").unwrap();
        assert_eq!(tree.root_node().named_child_count(), 0);
    }
}
