//! The scope-tracking classification visitor.
//!
//! Depth-first, pre-order-biased walk over a parsed tree: each construct
//! first records the identifiers it binds into the *enclosing* scope using
//! the context as of entry, then updates the flags/depths it owns, records
//! the identifiers it binds into its *own* scope (def parameters), recurses,
//! and restores the flags/depths to their exact prior values.
//!
//! The save/restore discipline stands in for an explicit stack; call-graph
//! return ordering undoes context changes in the right order, which holds
//! under arbitrary re-entrant nesting of the same construct kind because
//! every flag restores its saved value rather than toggling.

use tree_sitter::{Node, Tree};

use pyscope_error::Result;

use crate::context::TraversalContext;
use crate::parse::parse_module;
use crate::record::{IdentifierRecord, RoleTag};
use crate::token::NodeKind;

/// Classify every bound identifier in a parsed tree.
///
/// Precondition: `tree` parsed without errors (see
/// [`parse_module`](crate::parse_module)). A malformed tree is a programming
/// error on the caller's side, not a runtime case handled here.
pub fn classify(tree: &Tree, source: &[u8]) -> Vec<IdentifierRecord> {
    let root = tree.root_node();
    debug_assert!(
        !root.has_error(),
        "classify requires an error-free parse tree"
    );

    let mut tracker = ScopeTracker::new(source);
    tracker.visit_node(root);

    debug_assert_eq!(tracker.ctx.scope_depth, 0, "unbalanced scope depth");
    debug_assert_eq!(tracker.ctx.indent_depth, 0, "unbalanced indent depth");
    tracker.records
}

/// Parse and classify in one step, for source that is already clean.
pub fn extract_identifiers(source: &[u8]) -> Result<Vec<IdentifierRecord>> {
    let tree = parse_module(source)?;
    Ok(classify(&tree, source))
}

struct ScopeTracker<'a> {
    source: &'a [u8],
    ctx: TraversalContext,
    // True while the binding environment we are emitting into is a class
    // body itself, not merely nested somewhere under one. The serialized
    // `in_class` flag stays true across method bodies; this one is cleared
    // by them, and it alone decides method vs function roles.
    in_class_body: bool,
    records: Vec<IdentifierRecord>,
}

impl<'a> ScopeTracker<'a> {
    fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            ctx: TraversalContext::new(),
            in_class_body: false,
            records: Vec::new(),
        }
    }

    fn node_text(&self, node: Node<'_>) -> String {
        String::from_utf8_lossy(&self.source[node.byte_range()]).into_owned()
    }

    /// Push a record with the current context snapshot. `node` supplies the
    /// source position, which is not always the identifier itself (class and
    /// function names are positioned at their definition node, exception
    /// names at their handler clause).
    fn record(&mut self, name: String, role: RoleTag, node: Node<'_>) {
        let point = node.start_position();
        self.records.push(IdentifierRecord {
            name,
            role,
            context: self.ctx,
            line: Some(point.row + 1),
            column: Some(point.column),
        });
    }

    fn visit_children(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit_node(child);
        }
    }

    fn visit_node(&mut self, node: Node<'_>) {
        match NodeKind::of(&node) {
            NodeKind::ClassDefinition => self.visit_class_definition(node),
            NodeKind::FunctionDefinition => self.visit_function_definition(node),
            NodeKind::Lambda => self.visit_lambda(node),
            NodeKind::Assignment => self.visit_assignment(node),
            NodeKind::ForStatement => self.visit_for_statement(node),
            NodeKind::WhileStatement => self.visit_while_statement(node),
            // An elif chains as a further nested if, so it re-enters the
            // same handler and adds its own indent level.
            NodeKind::IfStatement | NodeKind::ElifClause => self.visit_if_statement(node),
            NodeKind::WithStatement => self.visit_with_statement(node),
            NodeKind::TryStatement => self.visit_try_statement(node),
            NodeKind::ExceptClause => self.visit_except_clause(node),
            NodeKind::FinallyClause => self.visit_finally_clause(node),
            NodeKind::Comprehension => self.visit_comprehension(node),
            NodeKind::ForInClause => self.visit_for_in_clause(node),
            NodeKind::MatchStatement => self.visit_match_statement(node),
            NodeKind::CaseClause => self.visit_case_clause(node),
            NodeKind::ImportStatement => self.visit_import_statement(node),
            NodeKind::ImportFromStatement => self.visit_import_from(node),
            NodeKind::Other => self.visit_children(node),
        }
    }

    fn visit_class_definition(&mut self, node: Node<'_>) {
        if let Some(name) = node.child_by_field_name("name") {
            let text = self.node_text(name);
            self.record(text, RoleTag::ClassName, node);
        }

        let prev = self.ctx.in_class;
        let prev_body = self.in_class_body;
        self.ctx.in_class = true;
        self.in_class_body = true;
        self.ctx.scope_depth += 1;
        self.ctx.indent_depth += 1;

        self.visit_children(node);

        self.ctx.scope_depth -= 1;
        self.ctx.indent_depth -= 1;
        self.in_class_body = prev_body;
        self.ctx.in_class = prev;
    }

    fn visit_function_definition(&mut self, node: Node<'_>) {
        // Method vs function is decided once, at the def node; the
        // parameters inherit the decision. A def inside a method body is a
        // local function, not a method, even though `in_class` is still set.
        let (name_role, param_role) = if self.in_class_body {
            (RoleTag::MethodName, RoleTag::MethodParameter)
        } else {
            (RoleTag::FunctionName, RoleTag::FunctionParameter)
        };

        // The name binds into the enclosing scope, the parameters into the
        // function's own, so only the latter see the updated context.
        if let Some(name) = node.child_by_field_name("name") {
            let text = self.node_text(name);
            self.record(text, name_role, node);
        }

        let prev = self.ctx.in_function;
        let prev_body = self.in_class_body;
        self.ctx.in_function = true;
        self.in_class_body = false;
        self.ctx.scope_depth += 1;
        self.ctx.indent_depth += 1;

        if let Some(params) = node.child_by_field_name("parameters") {
            self.record_parameters(params, param_role);
        }
        self.visit_children(node);

        self.ctx.scope_depth -= 1;
        self.ctx.indent_depth -= 1;
        self.in_class_body = prev_body;
        self.ctx.in_function = prev;
    }

    /// Named parameters in source order, then `*args`, then `**kwargs`.
    fn record_parameters(&mut self, params: Node<'_>, role: RoleTag) {
        let mut cursor = params.walk();
        let children: Vec<Node<'_>> = params.named_children(&mut cursor).collect();

        for param in &children {
            if let Some(ident) = plain_parameter_name(*param) {
                let name = self.node_text(ident);
                self.record(name, role, ident);
            }
        }
        for param in &children {
            if let Some(ident) = splat_parameter_name(*param, "list_splat_pattern") {
                let name = self.node_text(ident);
                self.record(name, role, ident);
            }
        }
        for param in &children {
            if let Some(ident) = splat_parameter_name(*param, "dictionary_splat_pattern") {
                let name = self.node_text(ident);
                self.record(name, role, ident);
            }
        }
    }

    fn visit_lambda(&mut self, node: Node<'_>) {
        if let Some(params) = node.child_by_field_name("parameters") {
            self.record_lambda_parameters(params);
        }

        let prev = self.ctx.in_lambda;
        self.ctx.in_lambda = true;
        self.ctx.scope_depth += 1;

        self.visit_children(node);

        self.ctx.scope_depth -= 1;
        self.ctx.in_lambda = prev;
    }

    /// Only plain positional parameters are recorded for lambdas; splats and
    /// anything after a bare `*` separator are not, and the role stays
    /// `lambda parameter` regardless of any enclosing class or function.
    fn record_lambda_parameters(&mut self, params: Node<'_>) {
        let mut cursor = params.walk();
        let children: Vec<Node<'_>> = params.children(&mut cursor).collect();

        for param in children {
            match param.kind() {
                "identifier" => {
                    let name = self.node_text(param);
                    self.record(name, RoleTag::LambdaParameter, param);
                }
                "default_parameter" => {
                    if let Some(ident) = param.child_by_field_name("name") {
                        let name = self.node_text(ident);
                        self.record(name, RoleTag::LambdaParameter, ident);
                    }
                }
                "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" | "*" => {
                    break;
                }
                _ => {}
            }
        }
    }

    fn visit_assignment(&mut self, node: Node<'_>) {
        if let Some(left) = node.child_by_field_name("left") {
            self.record_assignment_target(left);
        }
        // Still descend: the right side may hold lambdas, comprehensions,
        // or a chained inner assignment.
        self.visit_children(node);
    }

    /// Plain assignment targets are decomposed at the top level only: a bare
    /// name or a `self.<attr>` attribute. Tuple targets, subscripts and
    /// non-self attributes bind nothing here. The recursive unpacking used
    /// for for/with/comprehension targets deliberately does not apply.
    fn record_assignment_target(&mut self, target: Node<'_>) {
        match target.kind() {
            "identifier" => {
                let name = self.node_text(target);
                self.record(name, RoleTag::Variable, target);
            }
            "attribute" => {
                let object = target.child_by_field_name("object");
                let attr = target.child_by_field_name("attribute");
                if let (Some(object), Some(attr)) = (object, attr) {
                    if object.kind() == "identifier" && self.node_text(object) == "self" {
                        let name = self.node_text(attr);
                        self.record(name, RoleTag::InstanceVariable, target);
                    }
                }
            }
            _ => {}
        }
    }

    fn visit_for_statement(&mut self, node: Node<'_>) {
        if let Some(left) = node.child_by_field_name("left") {
            self.record_unpacked_targets(left, RoleTag::ForLoopVariable);
        }

        let prev = self.ctx.in_for;
        self.ctx.in_for = true;
        self.ctx.indent_depth += 1;

        self.visit_children(node);

        self.ctx.indent_depth -= 1;
        self.ctx.in_for = prev;
    }

    fn visit_while_statement(&mut self, node: Node<'_>) {
        let prev = self.ctx.in_while;
        self.ctx.in_while = true;
        self.ctx.indent_depth += 1;

        self.visit_children(node);

        self.ctx.indent_depth -= 1;
        self.ctx.in_while = prev;
    }

    fn visit_if_statement(&mut self, node: Node<'_>) {
        let prev = self.ctx.in_if;
        self.ctx.in_if = true;
        self.ctx.indent_depth += 1;

        self.visit_children(node);

        self.ctx.indent_depth -= 1;
        self.ctx.in_if = prev;
    }

    fn visit_with_statement(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        let clauses: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        for clause in clauses {
            if clause.kind() != "with_clause" {
                continue;
            }
            let mut items = clause.walk();
            let items: Vec<Node<'_>> = clause.named_children(&mut items).collect();
            for item in items {
                if item.kind() == "with_item" {
                    self.record_with_item(item);
                }
            }
        }

        let prev = self.ctx.in_with;
        self.ctx.in_with = true;
        self.ctx.indent_depth += 1;

        self.visit_children(node);

        self.ctx.indent_depth -= 1;
        self.ctx.in_with = prev;
    }

    fn record_with_item(&mut self, item: Node<'_>) {
        let Some(value) = item.child_by_field_name("value") else {
            return;
        };
        if value.kind() != "as_pattern" {
            return;
        }
        if let Some(alias) = value.child_by_field_name("alias") {
            self.record_as_target(alias, RoleTag::WithVariable);
        }
    }

    /// An `as_pattern_target` wraps the target expression as its sole named
    /// child; the unpacking dispatch needs that inner node's kind (a bare
    /// name, a tuple or list, or an attribute/subscript that binds no plain
    /// name).
    fn record_as_target(&mut self, target: Node<'_>, role: RoleTag) {
        let inner = if target.kind() == "as_pattern_target" {
            let Some(inner) = first_named_child(target) else {
                return;
            };
            inner
        } else {
            target
        };
        self.record_unpacked_targets(inner, role);
    }

    /// Body first under the try flag, then the handlers, then the finally
    /// suite, then the else suite under the ambient context. The else suite
    /// gets no flag of its own; that asymmetry against except/finally is
    /// part of the contract.
    fn visit_try_statement(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();

        let prev = self.ctx.in_try;
        self.ctx.in_try = true;
        self.ctx.indent_depth += 1;
        for child in &children {
            if child.kind() == "block" {
                self.visit_node(*child);
            }
        }
        self.ctx.indent_depth -= 1;
        self.ctx.in_try = prev;

        for child in &children {
            if matches!(child.kind(), "except_clause" | "except_group_clause") {
                self.visit_node(*child);
            }
        }
        for child in &children {
            if child.kind() == "finally_clause" {
                self.visit_node(*child);
            }
        }
        for child in &children {
            if child.kind() == "else_clause" {
                self.visit_children(*child);
            }
        }
    }

    fn visit_except_clause(&mut self, node: Node<'_>) {
        if let Some(ident) = except_binding(node) {
            let name = self.node_text(ident);
            // positioned at the handler clause, not the bound name
            self.record(name, RoleTag::ExceptionVariable, node);
        }

        let prev = self.ctx.in_except;
        self.ctx.in_except = true;
        self.ctx.scope_depth += 1;
        self.ctx.indent_depth += 1;

        self.visit_children(node);

        self.ctx.scope_depth -= 1;
        self.ctx.indent_depth -= 1;
        self.ctx.in_except = prev;
    }

    fn visit_finally_clause(&mut self, node: Node<'_>) {
        let prev = self.ctx.in_finally;
        self.ctx.in_finally = true;
        self.ctx.indent_depth += 1;

        self.visit_children(node);

        self.ctx.indent_depth -= 1;
        self.ctx.in_finally = prev;
    }

    fn visit_comprehension(&mut self, node: Node<'_>) {
        let prev = self.ctx.in_comprehension;
        self.ctx.in_comprehension = true;
        self.ctx.scope_depth += 1;

        self.visit_children(node);

        self.ctx.scope_depth -= 1;
        self.ctx.in_comprehension = prev;
    }

    /// The binding clause of a comprehension. Reached only under an
    /// enclosing comprehension node, so the targets are recorded with the
    /// comprehension flag and scope bump already applied.
    fn visit_for_in_clause(&mut self, node: Node<'_>) {
        if let Some(left) = node.child_by_field_name("left") {
            self.record_unpacked_targets(left, RoleTag::ComprehensionVariable);
        }
        self.visit_children(node);
    }

    fn visit_match_statement(&mut self, node: Node<'_>) {
        let prev = self.ctx.in_match;
        self.ctx.in_match = true;
        self.ctx.scope_depth += 1;
        self.ctx.indent_depth += 1;

        self.visit_children(node);

        self.ctx.scope_depth -= 1;
        self.ctx.indent_depth -= 1;
        self.ctx.in_match = prev;
    }

    fn visit_case_clause(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        for child in children {
            if child.kind() == "case_pattern" {
                self.walk_case_pattern(child);
            } else {
                // guard and body
                self.visit_node(child);
            }
        }
    }

    /// Capture-style bindings only: a named `as` capture records its alias
    /// and never descends into the guarded pattern; splat and keyword names
    /// are never recorded; literal and value patterns bind nothing.
    fn walk_case_pattern(&mut self, node: Node<'_>) {
        match node.kind() {
            "as_pattern" => {
                if let Some(ident) = as_pattern_alias(node) {
                    let name = self.node_text(ident);
                    self.record(name, RoleTag::PatternMatchVariable, node);
                }
            }
            "identifier" | "capture_pattern" => {
                let name = self.node_text(node);
                if name != "_" {
                    self.record(name, RoleTag::PatternMatchVariable, node);
                }
            }
            "dotted_name" => {
                // a single bare name is a capture; a dotted path is a value
                // pattern and binds nothing
                let mut cursor = node.walk();
                let parts: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
                if parts.len() == 1 && parts[0].kind() == "identifier" {
                    let name = self.node_text(parts[0]);
                    if name != "_" {
                        self.record(name, RoleTag::PatternMatchVariable, node);
                    }
                }
            }
            "class_pattern" | "keyword_pattern" => {
                // first named child is the class name / keyword, not a binding
                let mut cursor = node.walk();
                let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
                for child in children.into_iter().skip(1) {
                    self.walk_case_pattern(child);
                }
            }
            "splat_pattern" => {}
            "case_pattern" | "union_pattern" | "tuple_pattern" | "list_pattern"
            | "dict_pattern" => {
                let mut cursor = node.walk();
                let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
                for child in children {
                    self.walk_case_pattern(child);
                }
            }
            _ => {}
        }
    }

    fn visit_import_statement(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        let names: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        for name in names {
            match name.kind() {
                "dotted_name" => {
                    // `import a.b.c` binds only the leading path component
                    if let Some(first) = first_named_child(name) {
                        let text = self.node_text(first);
                        self.record(text, RoleTag::ImportAlias, name);
                    }
                }
                "aliased_import" => {
                    if let Some(alias) = name.child_by_field_name("alias") {
                        let text = self.node_text(alias);
                        self.record(text, RoleTag::ImportAlias, name);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_import_from(&mut self, node: Node<'_>) {
        let module = node.child_by_field_name("module_name");
        let mut cursor = node.walk();
        let names: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        for name in names {
            if let Some(module) = module {
                if name.id() == module.id() {
                    continue;
                }
            }
            match name.kind() {
                "dotted_name" => {
                    let text = self.node_text(name);
                    self.record(text, RoleTag::ImportAlias, name);
                }
                "aliased_import" => {
                    if let Some(alias) = name.child_by_field_name("alias") {
                        let text = self.node_text(alias);
                        self.record(text, RoleTag::ImportAlias, name);
                    }
                }
                "wildcard_import" => {
                    self.record("*".to_string(), RoleTag::ImportAlias, name);
                }
                _ => {}
            }
        }
    }

    /// Recursive tuple/list unpacking for for-loop, with-statement and
    /// comprehension targets. Starred elements and attribute or subscript
    /// targets bind no plain name and are skipped.
    fn record_unpacked_targets(&mut self, target: Node<'_>, role: RoleTag) {
        match target.kind() {
            "identifier" => {
                let name = self.node_text(target);
                self.record(name, role, target);
            }
            "pattern_list" | "tuple_pattern" | "list_pattern" | "tuple" | "list" => {
                let mut cursor = target.walk();
                let children: Vec<Node<'_>> = target.named_children(&mut cursor).collect();
                for child in children {
                    self.record_unpacked_targets(child, role);
                }
            }
            _ => {}
        }
    }
}

fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let first = node.named_children(&mut cursor).next();
    first
}

fn find_named_child<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// The name bound by a plain (non-splat) parameter node, if any.
fn plain_parameter_name(param: Node<'_>) -> Option<Node<'_>> {
    match param.kind() {
        "identifier" => Some(param),
        "typed_parameter" => first_named_child(param).filter(|c| c.kind() == "identifier"),
        "default_parameter" | "typed_default_parameter" => param
            .child_by_field_name("name")
            .filter(|c| c.kind() == "identifier"),
        _ => None,
    }
}

/// The name bound by a `*args`/`**kwargs` parameter, possibly behind a type
/// annotation wrapper.
fn splat_parameter_name<'t>(param: Node<'t>, splat_kind: &str) -> Option<Node<'t>> {
    let splat = if param.kind() == splat_kind {
        param
    } else if param.kind() == "typed_parameter" {
        first_named_child(param).filter(|c| c.kind() == splat_kind)?
    } else {
        return None;
    };
    find_named_child(splat, "identifier")
}

/// The identifier bound by `except ... as name`, if present.
fn except_binding(clause: Node<'_>) -> Option<Node<'_>> {
    let as_pat = find_named_child(clause, "as_pattern")?;
    let ident = as_pattern_alias(as_pat)?;
    Some(ident)
}

/// The alias identifier of an `as_pattern`, covering both the
/// `as_pattern_target` wrapper shape (with/except, holding the bound name as
/// its sole named child) and the trailing identifier shape used inside case
/// patterns, which carries no alias field.
fn as_pattern_alias(as_pat: Node<'_>) -> Option<Node<'_>> {
    if let Some(alias) = as_pat.child_by_field_name("alias") {
        let target = if alias.kind() == "as_pattern_target" {
            first_named_child(alias)?
        } else {
            alias
        };
        return (target.kind() == "identifier").then_some(target);
    }
    let mut cursor = as_pat.walk();
    let last = as_pat
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "identifier")
        .last();
    last
}
