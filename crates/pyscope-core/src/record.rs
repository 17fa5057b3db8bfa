//! Output records: one per bound identifier, immutable once pushed.

use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};

use crate::context::TraversalContext;

/// The syntactic role of a recorded identifier.
///
/// Serialized labels match the dataset vocabulary downstream consumers
/// already key on ("method parameter", "for_loop variable", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, IntoStaticStr)]
pub enum RoleTag {
    #[serde(rename = "class name")]
    #[strum(serialize = "class name")]
    ClassName,
    #[serde(rename = "method name")]
    #[strum(serialize = "method name")]
    MethodName,
    #[serde(rename = "function name")]
    #[strum(serialize = "function name")]
    FunctionName,
    #[serde(rename = "method parameter")]
    #[strum(serialize = "method parameter")]
    MethodParameter,
    #[serde(rename = "function parameter")]
    #[strum(serialize = "function parameter")]
    FunctionParameter,
    #[serde(rename = "lambda parameter")]
    #[strum(serialize = "lambda parameter")]
    LambdaParameter,
    #[serde(rename = "variable")]
    #[strum(serialize = "variable")]
    Variable,
    #[serde(rename = "instance variable")]
    #[strum(serialize = "instance variable")]
    InstanceVariable,
    #[serde(rename = "for_loop variable")]
    #[strum(serialize = "for_loop variable")]
    ForLoopVariable,
    #[serde(rename = "with_statement variable")]
    #[strum(serialize = "with_statement variable")]
    WithVariable,
    #[serde(rename = "exception variable")]
    #[strum(serialize = "exception variable")]
    ExceptionVariable,
    #[serde(rename = "comprehension variable")]
    #[strum(serialize = "comprehension variable")]
    ComprehensionVariable,
    #[serde(rename = "pattern_matching variable")]
    #[strum(serialize = "pattern_matching variable")]
    PatternMatchVariable,
    #[serde(rename = "import alias")]
    #[strum(serialize = "import alias")]
    ImportAlias,
}

/// One bound identifier with its role and the context it was bound in.
///
/// The context is copied by value at record time; later flag or depth
/// changes in the traversal never touch an emitted record. Position is the
/// originating node's start point (1-based line, 0-based column) and is
/// optional per the output contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifierRecord {
    pub name: String,
    pub role: RoleTag,
    #[serde(flatten)]
    pub context: TraversalContext,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels() {
        assert_eq!(RoleTag::ClassName.to_string(), "class name");
        assert_eq!(RoleTag::ForLoopVariable.to_string(), "for_loop variable");
        assert_eq!(
            RoleTag::PatternMatchVariable.to_string(),
            "pattern_matching variable"
        );
        let s: &'static str = RoleTag::ImportAlias.into();
        assert_eq!(s, "import alias");
    }

    #[test]
    fn test_record_serializes_flat_context() {
        let record = IdentifierRecord {
            name: "attr".to_string(),
            role: RoleTag::InstanceVariable,
            context: TraversalContext {
                in_function: true,
                in_class: true,
                scope_depth: 2,
                indent_depth: 2,
                ..TraversalContext::default()
            },
            line: Some(3),
            column: Some(8),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "attr");
        assert_eq!(json["role"], "instance variable");
        assert_eq!(json["in_class"], true);
        assert_eq!(json["scope_depth"], 2);
        assert_eq!(json["line"], 3);
    }
}
