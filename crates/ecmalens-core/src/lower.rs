//! Lowering of tree-sitter concrete syntax trees into the ESTree node model.
//!
//! The JavaScript and TypeScript grammars share most node names, so a single
//! dispatch serves both. Type-level syntax (annotations, type arguments,
//! interface bodies) is dropped; grammar nodes with no ESTree counterpart
//! become [`NodeKind::Unknown`] and keep their named children.

use crate::ast::{
    Accessibility, ExportKind, Field, LiteralValue, MethodKind, Node, NodeFlags, NodeKind,
    PropertyKind, VariableKind,
};
use crate::source::LineIndex;
use tree_sitter::Node as TsNode;

pub(crate) struct Lowerer<'s> {
    source: &'s str,
    lines: LineIndex,
    ranges: bool,
    locations: bool,
}

impl<'s> Lowerer<'s> {
    pub(crate) fn new(source: &'s str, ranges: bool, locations: bool) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            ranges,
            locations,
        }
    }

    /// Lower the tree rooted at `root` and number it in pre-order.
    pub(crate) fn program(&self, root: TsNode) -> Node {
        let body = self.lower_all(root);
        let mut program = self.node(NodeKind::Program, root).with_nodes(Field::Body, body);
        program.number(&mut 0);
        program
    }

    fn lower(&self, n: TsNode) -> Option<Node> {
        if !n.is_named() || n.is_extra() {
            return None;
        }
        let node = match n.kind() {
            "hash_bang_line" | "comment" | "html_comment" | "decorator" => return None,
            "parenthesized_expression" | "else_clause" => return self.first(n),
            "finally_clause" => return self.field(n, "body"),

            "program" => self.node(NodeKind::Program, n).with_nodes(Field::Body, self.lower_all(n)),
            "expression_statement" => {
                let expression = self.first(n)?;
                if expression.is(NodeKind::TSModuleDeclaration) {
                    return Some(expression);
                }
                self.node(NodeKind::ExpressionStatement, n).with(Field::Expression, expression)
            }
            "statement_block" => self.block(NodeKind::BlockStatement, n),
            "empty_statement" => self.node(NodeKind::EmptyStatement, n),
            "debugger_statement" => self.node(NodeKind::DebuggerStatement, n),
            "return_statement" => self
                .node(NodeKind::ReturnStatement, n)
                .with_opt(Field::Argument, self.first(n)),
            "throw_statement" => self
                .node(NodeKind::ThrowStatement, n)
                .with_opt(Field::Argument, self.first(n)),
            "if_statement" => self
                .node(NodeKind::IfStatement, n)
                .with_opt(Field::Test, self.field(n, "condition"))
                .with_opt(Field::Consequent, self.field(n, "consequence"))
                .with_opt(Field::Alternate, self.field(n, "alternative")),
            "switch_statement" => {
                let cases = n
                    .child_by_field_name("body")
                    .map(|body| self.lower_all(body))
                    .unwrap_or_default();
                self.node(NodeKind::SwitchStatement, n)
                    .with_opt(Field::Discriminant, self.field(n, "value"))
                    .with_nodes(Field::Cases, cases)
            }
            "switch_case" | "switch_default" => self
                .node(NodeKind::SwitchCase, n)
                .with_opt(Field::Test, self.field(n, "value"))
                .with_nodes(Field::Consequent, self.fields(n, "body")),
            "while_statement" => self
                .node(NodeKind::WhileStatement, n)
                .with_opt(Field::Test, self.field(n, "condition"))
                .with_opt(Field::Body, self.field(n, "body")),
            "do_statement" => self
                .node(NodeKind::DoWhileStatement, n)
                .with_opt(Field::Body, self.field(n, "body"))
                .with_opt(Field::Test, self.field(n, "condition")),
            "for_statement" => self
                .node(NodeKind::ForStatement, n)
                .with_opt(Field::Init, self.for_clause(n, "initializer"))
                .with_opt(Field::Test, self.for_clause(n, "condition"))
                .with_opt(Field::Update, self.for_clause(n, "increment"))
                .with_opt(Field::Body, self.field(n, "body")),
            "for_in_statement" => self.for_in(n),
            "break_statement" => self
                .node(NodeKind::BreakStatement, n)
                .with_opt(Field::Label, self.field(n, "label")),
            "continue_statement" => self
                .node(NodeKind::ContinueStatement, n)
                .with_opt(Field::Label, self.field(n, "label")),
            "labeled_statement" => self
                .node(NodeKind::LabeledStatement, n)
                .with_opt(Field::Label, self.field(n, "label"))
                .with_opt(Field::Body, self.field(n, "body")),
            "try_statement" => self
                .node(NodeKind::TryStatement, n)
                .with_opt(Field::Block, self.field(n, "body"))
                .with_opt(Field::Handler, self.field(n, "handler"))
                .with_opt(Field::Finalizer, self.field(n, "finalizer")),
            "catch_clause" => self
                .node(NodeKind::CatchClause, n)
                .with_opt(Field::Param, self.field(n, "parameter"))
                .with_opt(Field::Body, self.field(n, "body")),

            "variable_declaration" => self.declaration(n, VariableKind::Var),
            "lexical_declaration" => {
                let kind = n
                    .child_by_field_name("kind")
                    .and_then(|k| VariableKind::parse(k.kind()))
                    .unwrap_or(VariableKind::Let);
                self.declaration(n, kind)
            }
            "variable_declarator" => self
                .node(NodeKind::VariableDeclarator, n)
                .with_opt(Field::Id, self.field(n, "name"))
                .with_opt(Field::Init, self.field(n, "value")),

            "function_declaration" | "generator_function_declaration" => {
                self.function(NodeKind::FunctionDeclaration, n)
            }
            "function_expression" | "function" | "generator_function" => {
                self.function(NodeKind::FunctionExpression, n)
            }
            "arrow_function" => self.arrow(n),
            "class_declaration" | "abstract_class_declaration" => {
                self.class(NodeKind::ClassDeclaration, n)
            }
            "class" => self.class(NodeKind::ClassExpression, n),
            "class_body" => self.block(NodeKind::ClassBody, n),
            "method_definition" => self.method(n),
            "field_definition" => self.class_field(n, "property"),
            "public_field_definition" => self.class_field(n, "name"),
            "class_static_block" => {
                let body = n
                    .child_by_field_name("body")
                    .map(|block| self.lower_all(block))
                    .unwrap_or_default();
                self.node(NodeKind::StaticBlock, n).with_nodes(Field::Body, body)
            }

            "import_statement" => self.import(n),
            "export_statement" => self.export(n),

            "identifier"
            | "property_identifier"
            | "shorthand_property_identifier"
            | "shorthand_property_identifier_pattern"
            | "statement_identifier"
            | "type_identifier"
            | "undefined" => self.identifier(n),
            "private_property_identifier" => {
                let mut node = self.node(NodeKind::PrivateIdentifier, n);
                node.props.name = Some(self.text(n).trim_start_matches('#').to_string());
                node
            }
            "this" => self.node(NodeKind::ThisExpression, n),
            "super" => self.node(NodeKind::Super, n),
            "true" => self.literal(n, LiteralValue::Boolean(true)),
            "false" => self.literal(n, LiteralValue::Boolean(false)),
            "null" => self.literal(n, LiteralValue::Null),
            "number" => self.literal(n, number_value(self.text(n))),
            "string" => {
                let raw = self.text(n);
                let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
                self.literal(n, LiteralValue::String(unescape(inner)))
            }
            "regex" => {
                let pattern = n.child_by_field_name("pattern").map(|p| self.text(p));
                let flags = n.child_by_field_name("flags").map(|f| self.text(f));
                self.literal(
                    n,
                    LiteralValue::RegExp {
                        pattern: pattern.unwrap_or_default().to_string(),
                        flags: flags.unwrap_or_default().to_string(),
                    },
                )
            }
            "template_string" => self.template(n),

            "object" => self.object(NodeKind::ObjectExpression, n),
            "object_pattern" => self.object(NodeKind::ObjectPattern, n),
            "array" => self.array(NodeKind::ArrayExpression, n),
            "array_pattern" => self.array(NodeKind::ArrayPattern, n),
            "spread_element" => self
                .node(NodeKind::SpreadElement, n)
                .with_opt(Field::Argument, self.first(n)),
            "rest_pattern" => self
                .node(NodeKind::RestElement, n)
                .with_opt(Field::Argument, self.first(n)),
            "assignment_pattern" | "object_assignment_pattern" => self
                .node(NodeKind::AssignmentPattern, n)
                .with_opt(Field::Left, self.field(n, "left"))
                .with_opt(Field::Right, self.field(n, "right")),
            "required_parameter" | "optional_parameter" => return self.parameter(n),

            "call_expression" => self.call(n),
            "new_expression" => {
                let arguments = n
                    .child_by_field_name("arguments")
                    .map(|args| self.lower_all(args))
                    .unwrap_or_default();
                self.node(NodeKind::NewExpression, n)
                    .with_opt(Field::Callee, self.field(n, "constructor"))
                    .with_nodes(Field::Arguments, arguments)
            }
            "member_expression" => {
                let mut node = self
                    .node(NodeKind::MemberExpression, n)
                    .with_opt(Field::Object, self.field(n, "object"))
                    .with_opt(Field::Property, self.field(n, "property"));
                if has_child(n, "optional_chain") {
                    node.props.flags |= NodeFlags::OPTIONAL;
                }
                node
            }
            "subscript_expression" => {
                let mut node = self
                    .node(NodeKind::MemberExpression, n)
                    .with_opt(Field::Object, self.field(n, "object"))
                    .with_opt(Field::Property, self.field(n, "index"));
                node.props.flags |= NodeFlags::COMPUTED;
                if has_child(n, "optional_chain") {
                    node.props.flags |= NodeFlags::OPTIONAL;
                }
                node
            }
            "assignment_expression" => {
                let mut node = self.binary(NodeKind::AssignmentExpression, n);
                node.props.operator = Some("=".to_string());
                node
            }
            "augmented_assignment_expression" => self.binary(NodeKind::AssignmentExpression, n),
            "binary_expression" => {
                let logical = n
                    .child_by_field_name("operator")
                    .is_some_and(|op| matches!(op.kind(), "&&" | "||" | "??"));
                if logical {
                    self.binary(NodeKind::LogicalExpression, n)
                } else {
                    self.binary(NodeKind::BinaryExpression, n)
                }
            }
            "unary_expression" => {
                let mut node = self
                    .node(NodeKind::UnaryExpression, n)
                    .with_opt(Field::Argument, self.field(n, "argument"));
                node.props.operator = n.child_by_field_name("operator").map(|op| self.text(op).to_string());
                node.props.flags |= NodeFlags::PREFIX;
                node
            }
            "update_expression" => {
                let argument = n.child_by_field_name("argument");
                let operator = n.child_by_field_name("operator");
                let mut node = self
                    .node(NodeKind::UpdateExpression, n)
                    .with_opt(Field::Argument, argument.and_then(|a| self.lower(a)));
                node.props.operator = operator.map(|op| self.text(op).to_string());
                if let (Some(op), Some(arg)) = (operator, argument)
                    && op.start_byte() < arg.start_byte()
                {
                    node.props.flags |= NodeFlags::PREFIX;
                }
                node
            }
            "ternary_expression" => self
                .node(NodeKind::ConditionalExpression, n)
                .with_opt(Field::Test, self.field(n, "condition"))
                .with_opt(Field::Consequent, self.field(n, "consequence"))
                .with_opt(Field::Alternate, self.field(n, "alternative")),
            "await_expression" => self
                .node(NodeKind::AwaitExpression, n)
                .with_opt(Field::Argument, self.first(n)),
            "yield_expression" => {
                let mut node = self
                    .node(NodeKind::YieldExpression, n)
                    .with_opt(Field::Argument, self.first(n));
                if has_token(n, "*") {
                    node.props.flags |= NodeFlags::DELEGATE;
                }
                node
            }
            "sequence_expression" => {
                let mut expressions = Vec::new();
                self.flatten_sequence(n, &mut expressions);
                self.node(NodeKind::SequenceExpression, n)
                    .with_nodes(Field::Expressions, expressions)
            }

            "interface_declaration" => self
                .node(NodeKind::TSInterfaceDeclaration, n)
                .with_opt(Field::Id, self.field(n, "name")),
            "type_alias_declaration" => self
                .node(NodeKind::TSTypeAliasDeclaration, n)
                .with_opt(Field::Id, self.field(n, "name")),
            "enum_declaration" => self
                .node(NodeKind::TSEnumDeclaration, n)
                .with_opt(Field::Id, self.field(n, "name")),
            "module" | "internal_module" => {
                let body = n
                    .child_by_field_name("body")
                    .map(|block| self.block(NodeKind::TSModuleBlock, block));
                self.node(NodeKind::TSModuleDeclaration, n)
                    .with_opt(Field::Id, self.field(n, "name"))
                    .with_opt(Field::Body, body)
            }
            "ambient_declaration" => {
                let mut inner = self.first(n)?;
                inner.props.flags |= NodeFlags::DECLARE;
                return Some(inner);
            }
            "as_expression" => self.wrap(NodeKind::TSAsExpression, n, self.first(n)),
            "satisfies_expression" => self.wrap(NodeKind::TSSatisfiesExpression, n, self.first(n)),
            "non_null_expression" => self.wrap(NodeKind::TSNonNullExpression, n, self.first(n)),
            "type_assertion" => {
                let expression = named(n)
                    .into_iter()
                    .filter(|c| c.kind() != "type_arguments")
                    .find_map(|c| self.lower(c));
                self.wrap(NodeKind::TSTypeAssertion, n, expression)
            }

            _ => self.unknown(n),
        };
        Some(node)
    }

    // -- builders ---------------------------------------------------------

    fn node(&self, kind: NodeKind, n: TsNode) -> Node {
        self.spanned(kind, n.start_byte(), n.end_byte())
    }

    fn spanned(&self, kind: NodeKind, start: usize, end: usize) -> Node {
        let mut node = Node::new(kind);
        if self.ranges {
            node.range = Some(crate::ast::Range { start, end });
        }
        if self.locations {
            node.loc = Some(self.lines.location(start, end));
        }
        node
    }

    fn text(&self, n: TsNode) -> &'s str {
        self.source.get(n.byte_range()).unwrap_or_default()
    }

    fn identifier(&self, n: TsNode) -> Node {
        let mut node = self.node(NodeKind::Identifier, n);
        node.props.name = Some(self.text(n).to_string());
        node
    }

    fn literal(&self, n: TsNode, value: LiteralValue) -> Node {
        let mut node = self.node(NodeKind::Literal, n);
        node.props.raw = Some(self.text(n).to_string());
        node.props.value = Some(value);
        node
    }

    fn wrap(&self, kind: NodeKind, n: TsNode, expression: Option<Node>) -> Node {
        self.node(kind, n).with_opt(Field::Expression, expression)
    }

    fn unknown(&self, n: TsNode) -> Node {
        let mut node = self
            .node(NodeKind::Unknown, n)
            .with_nodes(Field::Children, self.lower_all(n));
        node.props.syntax = Some(n.kind().to_string());
        node
    }

    fn block(&self, kind: NodeKind, n: TsNode) -> Node {
        self.node(kind, n).with_nodes(Field::Body, self.lower_all(n))
    }

    fn binary(&self, kind: NodeKind, n: TsNode) -> Node {
        let mut node = self
            .node(kind, n)
            .with_opt(Field::Left, self.field(n, "left"))
            .with_opt(Field::Right, self.field(n, "right"));
        if let Some(op) = n.child_by_field_name("operator") {
            node.props.operator = Some(self.text(op).to_string());
        }
        node
    }

    // -- child access -----------------------------------------------------

    fn lower_all(&self, n: TsNode) -> Vec<Node> {
        named(n).into_iter().filter_map(|c| self.lower(c)).collect()
    }

    fn first(&self, n: TsNode) -> Option<Node> {
        named(n).into_iter().find_map(|c| self.lower(c))
    }

    fn field(&self, n: TsNode, name: &str) -> Option<Node> {
        n.child_by_field_name(name).and_then(|c| self.lower(c))
    }

    fn fields(&self, n: TsNode, name: &str) -> Vec<Node> {
        let mut cursor = n.walk();
        n.children_by_field_name(name, &mut cursor)
            .filter_map(|c| self.lower(c))
            .collect()
    }

    // -- statements -------------------------------------------------------

    fn declaration(&self, n: TsNode, kind: VariableKind) -> Node {
        let declarators = named(n)
            .into_iter()
            .filter(|c| c.kind() == "variable_declarator")
            .filter_map(|c| self.lower(c))
            .collect();
        let mut node = self
            .node(NodeKind::VariableDeclaration, n)
            .with_nodes(Field::Declarations, declarators);
        node.props.declaration_kind = Some(kind);
        node
    }

    /// `for (init; test; update)` clauses may be wrapped in statements.
    fn for_clause(&self, n: TsNode, name: &str) -> Option<Node> {
        let mut cursor = n.walk();
        let clause = n
            .children_by_field_name(name, &mut cursor)
            .find(|c| c.is_named() && !c.is_extra())?;
        match clause.kind() {
            "empty_statement" => None,
            "expression_statement" => self.first(clause),
            _ => self.lower(clause),
        }
    }

    fn for_in(&self, n: TsNode) -> Node {
        let of = n
            .child_by_field_name("operator")
            .is_some_and(|op| op.kind() == "of");
        let kind = if of {
            NodeKind::ForOfStatement
        } else {
            NodeKind::ForInStatement
        };
        let left = match n
            .child_by_field_name("kind")
            .and_then(|k| VariableKind::parse(k.kind()))
        {
            Some(declaration_kind) => {
                let left = n.child_by_field_name("left");
                let (start, end) = match (n.child_by_field_name("kind"), left) {
                    (Some(k), Some(l)) => (k.start_byte(), l.end_byte()),
                    _ => (n.start_byte(), n.end_byte()),
                };
                let declarator = left.map(|l| {
                    self.node(NodeKind::VariableDeclarator, l)
                        .with_opt(Field::Id, self.lower(l))
                        .with_opt(Field::Init, self.field(n, "value"))
                });
                let mut declaration = self
                    .spanned(NodeKind::VariableDeclaration, start, end)
                    .with_nodes(Field::Declarations, declarator.into_iter().collect());
                declaration.props.declaration_kind = Some(declaration_kind);
                Some(declaration)
            }
            None => self.field(n, "left"),
        };
        let mut node = self
            .node(kind, n)
            .with_opt(Field::Left, left)
            .with_opt(Field::Right, self.field(n, "right"))
            .with_opt(Field::Body, self.field(n, "body"));
        if has_token(n, "await") {
            node.props.flags |= NodeFlags::AWAIT;
        }
        node
    }

    // -- functions and classes -------------------------------------------

    fn params(&self, n: TsNode) -> Vec<Node> {
        if let Some(single) = n.child_by_field_name("parameter") {
            return self.lower(single).into_iter().collect();
        }
        n.child_by_field_name("parameters")
            .map(|params| self.lower_all(params))
            .unwrap_or_default()
    }

    fn parameter(&self, n: TsNode) -> Option<Node> {
        let pattern = self.field(n, "pattern")?;
        Some(match self.field(n, "value") {
            Some(default) => self
                .node(NodeKind::AssignmentPattern, n)
                .with(Field::Left, pattern)
                .with(Field::Right, default),
            None => pattern,
        })
    }

    fn function(&self, kind: NodeKind, n: TsNode) -> Node {
        let mut node = self
            .node(kind, n)
            .with_opt(Field::Id, self.field(n, "name"))
            .with_nodes(Field::Params, self.params(n))
            .with_opt(Field::Body, self.field(n, "body"));
        node.props.flags |= function_flags(n);
        node
    }

    fn arrow(&self, n: TsNode) -> Node {
        let body = n.child_by_field_name("body");
        let mut node = self
            .node(NodeKind::ArrowFunctionExpression, n)
            .with_nodes(Field::Params, self.params(n))
            .with_opt(Field::Body, body.and_then(|b| self.lower(b)));
        node.props.flags |= function_flags(n);
        if body.is_some_and(|b| b.kind() != "statement_block") {
            node.props.flags |= NodeFlags::EXPRESSION;
        }
        node
    }

    /// The function value of a method, spanning parameters through body.
    fn method_function(&self, n: TsNode) -> Node {
        let start = n
            .child_by_field_name("parameters")
            .map_or(n.start_byte(), |p| p.start_byte());
        let mut function = self
            .spanned(NodeKind::FunctionExpression, start, n.end_byte())
            .with_nodes(Field::Params, self.params(n))
            .with_opt(Field::Body, self.field(n, "body"));
        function.props.flags |= function_flags(n);
        function
    }

    /// Lower a property key, reporting whether it was computed.
    fn key(&self, n: TsNode, name: &str) -> (Option<Node>, bool) {
        match n.child_by_field_name(name) {
            Some(key) if key.kind() == "computed_property_name" => (self.first(key), true),
            Some(key) => (self.lower(key), false),
            None => (None, false),
        }
    }

    fn class(&self, kind: NodeKind, n: TsNode) -> Node {
        let super_class = named(n)
            .into_iter()
            .find(|c| c.kind() == "class_heritage")
            .and_then(|heritage| self.super_class(heritage));
        self.node(kind, n)
            .with_opt(Field::Id, self.field(n, "name"))
            .with_opt(Field::SuperClass, super_class)
            .with_opt(Field::Body, self.field(n, "body"))
    }

    fn super_class(&self, heritage: TsNode) -> Option<Node> {
        for clause in named(heritage) {
            match clause.kind() {
                "extends_clause" => return self.field(clause, "value"),
                "implements_clause" => {}
                _ => return self.lower(clause),
            }
        }
        None
    }

    fn method(&self, n: TsNode) -> Node {
        let (key, computed) = self.key(n, "name");
        let is_constructor =
            !computed && key.as_ref().and_then(Node::name) == Some("constructor");
        let mut node = self
            .node(NodeKind::MethodDefinition, n)
            .with_opt(Field::Key, key)
            .with(Field::Value, self.method_function(n));
        node.props.method_kind = Some(if has_token(n, "get") {
            MethodKind::Get
        } else if has_token(n, "set") {
            MethodKind::Set
        } else if is_constructor {
            MethodKind::Constructor
        } else {
            MethodKind::Method
        });
        node.props.accessibility = accessibility(n, self.source);
        node.props.flags |= member_flags(n, computed);
        node
    }

    fn class_field(&self, n: TsNode, key_field: &str) -> Node {
        let (key, computed) = self.key(n, key_field);
        let mut node = self
            .node(NodeKind::PropertyDefinition, n)
            .with_opt(Field::Key, key)
            .with_opt(Field::Value, self.field(n, "value"));
        node.props.accessibility = accessibility(n, self.source);
        node.props.flags |= member_flags(n, computed);
        if has_token(n, "declare") {
            node.props.flags |= NodeFlags::DECLARE;
        }
        node
    }

    // -- expressions ------------------------------------------------------

    fn call(&self, n: TsNode) -> Node {
        let callee = n.child_by_field_name("function");
        let arguments = n.child_by_field_name("arguments");
        if let Some(template) = arguments.filter(|a| a.kind() == "template_string") {
            return self
                .node(NodeKind::TaggedTemplateExpression, n)
                .with_opt(Field::Tag, callee.and_then(|c| self.lower(c)))
                .with(Field::Quasi, self.template(template));
        }
        let arguments = arguments.map(|a| self.lower_all(a)).unwrap_or_default();
        if callee.is_some_and(|c| c.kind() == "import") {
            return self
                .node(NodeKind::ImportExpression, n)
                .with_opt(Field::Source, arguments.into_iter().next());
        }
        let mut node = self
            .node(NodeKind::CallExpression, n)
            .with_opt(Field::Callee, callee.and_then(|c| self.lower(c)))
            .with_nodes(Field::Arguments, arguments);
        if has_child(n, "optional_chain") {
            node.props.flags |= NodeFlags::OPTIONAL;
        }
        node
    }

    fn flatten_sequence(&self, n: TsNode, out: &mut Vec<Node>) {
        for child in named(n) {
            if child.kind() == "sequence_expression" {
                self.flatten_sequence(child, out);
            } else if let Some(node) = self.lower(child) {
                out.push(node);
            }
        }
    }

    /// Quasis are the gaps around `${...}` substitutions.
    fn template(&self, n: TsNode) -> Node {
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        let mut start = n.start_byte() + 1;
        for substitution in named(n)
            .into_iter()
            .filter(|c| c.kind() == "template_substitution")
        {
            quasis.push(self.template_element(start, substitution.start_byte()));
            expressions.extend(self.first(substitution));
            start = substitution.end_byte();
        }
        let end = n.end_byte().saturating_sub(1).max(start);
        quasis.push(self.template_element(start, end));
        self.node(NodeKind::TemplateLiteral, n)
            .with_nodes(Field::Quasis, quasis)
            .with_nodes(Field::Expressions, expressions)
    }

    fn template_element(&self, start: usize, end: usize) -> Node {
        let raw = self.source.get(start..end).unwrap_or_default();
        let mut element = self.spanned(NodeKind::TemplateElement, start, end);
        element.props.value = Some(LiteralValue::String(unescape(raw)));
        element.props.raw = Some(raw.to_string());
        element
    }

    fn object(&self, kind: NodeKind, n: TsNode) -> Node {
        let properties = named(n)
            .into_iter()
            .filter_map(|c| self.object_member(c))
            .collect();
        self.node(kind, n).with_nodes(Field::Properties, properties)
    }

    fn object_member(&self, n: TsNode) -> Option<Node> {
        let mut property = self.node(NodeKind::Property, n);
        match n.kind() {
            "pair" | "pair_pattern" => {
                let (key, computed) = self.key(n, "key");
                if computed {
                    property.props.flags |= NodeFlags::COMPUTED;
                }
                property.props.property_kind = Some(PropertyKind::Init);
                Some(
                    property
                        .with_opt(Field::Key, key)
                        .with_opt(Field::Value, self.field(n, "value")),
                )
            }
            "shorthand_property_identifier" | "shorthand_property_identifier_pattern" => {
                property.props.property_kind = Some(PropertyKind::Init);
                property.props.flags |= NodeFlags::SHORTHAND;
                Some(
                    property
                        .with(Field::Key, self.identifier(n))
                        .with(Field::Value, self.identifier(n)),
                )
            }
            "object_assignment_pattern" => {
                let left = n.child_by_field_name("left")?;
                let value = self.lower(n)?;
                if left.kind() != "shorthand_property_identifier_pattern" {
                    return Some(value);
                }
                property.props.property_kind = Some(PropertyKind::Init);
                property.props.flags |= NodeFlags::SHORTHAND;
                Some(
                    property
                        .with(Field::Key, self.identifier(left))
                        .with(Field::Value, value),
                )
            }
            "method_definition" => {
                let (key, computed) = self.key(n, "name");
                let kind = if has_token(n, "get") {
                    PropertyKind::Get
                } else if has_token(n, "set") {
                    PropertyKind::Set
                } else {
                    property.props.flags |= NodeFlags::METHOD;
                    PropertyKind::Init
                };
                if computed {
                    property.props.flags |= NodeFlags::COMPUTED;
                }
                property.props.property_kind = Some(kind);
                Some(
                    property
                        .with_opt(Field::Key, key)
                        .with(Field::Value, self.method_function(n)),
                )
            }
            _ => self.lower(n),
        }
    }

    /// Array elements, with `None` for elided positions.
    fn array(&self, kind: NodeKind, n: TsNode) -> Node {
        let mut elements = Vec::new();
        let mut filled = false;
        let mut cursor = n.walk();
        for child in n.children(&mut cursor) {
            if child.is_extra() {
                continue;
            }
            match child.kind() {
                "," => {
                    if !filled {
                        elements.push(None);
                    }
                    filled = false;
                }
                _ if child.is_named() => {
                    elements.push(self.lower(child));
                    filled = true;
                }
                _ => {}
            }
        }
        self.node(kind, n).with_list(Field::Elements, elements)
    }

    // -- modules ----------------------------------------------------------

    fn import(&self, n: TsNode) -> Node {
        let mut specifiers = Vec::new();
        if let Some(clause) = named(n).into_iter().find(|c| c.kind() == "import_clause") {
            for part in named(clause) {
                match part.kind() {
                    "identifier" => specifiers.push(
                        self.node(NodeKind::ImportDefaultSpecifier, part)
                            .with(Field::Local, self.identifier(part)),
                    ),
                    "namespace_import" => specifiers.push(
                        self.node(NodeKind::ImportNamespaceSpecifier, part)
                            .with_opt(Field::Local, self.first(part)),
                    ),
                    "named_imports" => {
                        for specifier in named(part)
                            .into_iter()
                            .filter(|s| s.kind() == "import_specifier")
                        {
                            let imported = self.field(specifier, "name");
                            let local = self.field(specifier, "alias").or_else(|| imported.clone());
                            specifiers.push(
                                self.node(NodeKind::ImportSpecifier, specifier)
                                    .with_opt(Field::Imported, imported)
                                    .with_opt(Field::Local, local),
                            );
                        }
                    }
                    _ => {}
                }
            }
        }
        let mut node = self
            .node(NodeKind::ImportDeclaration, n)
            .with_nodes(Field::Specifiers, specifiers)
            .with_opt(Field::Source, self.field(n, "source"));
        node.props.export_kind = Some(if has_token(n, "type") {
            ExportKind::Type
        } else {
            ExportKind::Value
        });
        node
    }

    fn export(&self, n: TsNode) -> Node {
        let source = self.field(n, "source");
        let default = has_token(n, "default");

        if let Some(declaration) = n.child_by_field_name("declaration") {
            let declaration = self.lower(declaration);
            if default {
                return self
                    .node(NodeKind::ExportDefaultDeclaration, n)
                    .with_opt(Field::Declaration, declaration);
            }
            let type_only = declaration.as_ref().is_some_and(|d| {
                matches!(
                    d.kind,
                    NodeKind::TSInterfaceDeclaration | NodeKind::TSTypeAliasDeclaration
                )
            });
            let mut node = self
                .node(NodeKind::ExportNamedDeclaration, n)
                .with_opt(Field::Declaration, declaration)
                .with_nodes(Field::Specifiers, Vec::new());
            node.props.export_kind = Some(if type_only {
                ExportKind::Type
            } else {
                ExportKind::Value
            });
            return node;
        }

        if let Some(value) = n.child_by_field_name("value") {
            let Some(mut value) = self.lower(value) else {
                return self.unknown(n);
            };
            if !default {
                // `export = value`
                return self.unknown(n);
            }
            value.kind = match value.kind {
                NodeKind::FunctionExpression => NodeKind::FunctionDeclaration,
                NodeKind::ClassExpression => NodeKind::ClassDeclaration,
                other => other,
            };
            return self
                .node(NodeKind::ExportDefaultDeclaration, n)
                .with(Field::Declaration, value);
        }

        let children = named(n);
        if let Some(clause) = children.iter().find(|c| c.kind() == "export_clause") {
            let specifiers = named(*clause)
                .into_iter()
                .filter(|s| s.kind() == "export_specifier")
                .map(|specifier| {
                    let local = self.field(specifier, "name");
                    let exported = self.field(specifier, "alias").or_else(|| local.clone());
                    self.node(NodeKind::ExportSpecifier, specifier)
                        .with_opt(Field::Local, local)
                        .with_opt(Field::Exported, exported)
                })
                .collect();
            let mut node = self
                .node(NodeKind::ExportNamedDeclaration, n)
                .with_nodes(Field::Specifiers, specifiers)
                .with_opt(Field::Source, source);
            node.props.export_kind = Some(if has_token(n, "type") {
                ExportKind::Type
            } else {
                ExportKind::Value
            });
            return node;
        }

        if let Some(namespace) = children.iter().find(|c| c.kind() == "namespace_export") {
            return self
                .node(NodeKind::ExportAllDeclaration, n)
                .with_opt(Field::Exported, self.first(*namespace))
                .with_opt(Field::Source, source);
        }

        if has_token(n, "*") {
            return self
                .node(NodeKind::ExportAllDeclaration, n)
                .with_opt(Field::Source, source);
        }

        self.unknown(n)
    }
}

// -- grammar helpers -------------------------------------------------------

fn named(n: TsNode) -> Vec<TsNode> {
    let mut cursor = n.walk();
    n.named_children(&mut cursor)
        .filter(|c| !c.is_extra())
        .collect()
}

/// Whether `n` has a direct anonymous child token `token`.
fn has_token(n: TsNode, token: &str) -> bool {
    let mut cursor = n.walk();
    n.children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token)
}

fn has_child(n: TsNode, kind: &str) -> bool {
    let mut cursor = n.walk();
    n.children(&mut cursor).any(|c| c.kind() == kind)
}

fn function_flags(n: TsNode) -> NodeFlags {
    let mut flags = NodeFlags::empty();
    if has_token(n, "async") {
        flags |= NodeFlags::ASYNC;
    }
    if n.kind().starts_with("generator_function") || has_token(n, "*") {
        flags |= NodeFlags::GENERATOR;
    }
    flags
}

fn member_flags(n: TsNode, computed: bool) -> NodeFlags {
    let mut flags = NodeFlags::empty();
    if has_token(n, "static") {
        flags |= NodeFlags::STATIC;
    }
    if computed {
        flags |= NodeFlags::COMPUTED;
    }
    flags
}

fn accessibility(n: TsNode, source: &str) -> Option<Accessibility> {
    named(n)
        .into_iter()
        .find(|c| c.kind() == "accessibility_modifier")
        .and_then(|m| source.get(m.byte_range()))
        .and_then(Accessibility::parse)
}

/// Numeric literal value. Separators are ignored; a trailing `n` makes a
/// BigInt whose digits are kept verbatim.
pub(crate) fn number_value(raw: &str) -> LiteralValue {
    let clean: String = raw.chars().filter(|&c| c != '_').collect();
    if let Some(digits) = clean.strip_suffix('n') {
        return LiteralValue::BigInt(digits.to_string());
    }
    let lower = clean.to_ascii_lowercase();
    let with_prefix = |prefix: &str, radix: u32| {
        lower
            .strip_prefix(prefix)
            .and_then(|digits| digits_value(digits, radix))
    };
    let value = with_prefix("0x", 16)
        .or_else(|| with_prefix("0o", 8))
        .or_else(|| with_prefix("0b", 2))
        .or_else(|| {
            // Legacy octal: 017
            let digits = lower.strip_prefix('0')?;
            (!digits.is_empty() && digits.bytes().all(|b| (b'0'..=b'7').contains(&b)))
                .then(|| digits_value(digits, 8))
                .flatten()
        })
        .or_else(|| lower.parse::<f64>().ok())
        .unwrap_or(f64::NAN);
    LiteralValue::Number(value)
}

fn digits_value(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// Decode escape sequences in string and template contents.
pub(crate) fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut high_surrogate: Option<u32> = None;
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        let code = match escaped {
            'n' => Some('\n' as u32),
            't' => Some('\t' as u32),
            'r' => Some('\r' as u32),
            'b' => Some(0x08),
            'f' => Some(0x0c),
            'v' => Some(0x0b),
            '0' if !chars.peek().is_some_and(char::is_ascii_digit) => Some(0),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                u32::from_str_radix(&hex, 16).ok()
            }
            'u' => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&c| c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                u32::from_str_radix(&hex, 16).ok()
            }
            // Line continuation
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                None
            }
            '\n' | '\u{2028}' | '\u{2029}' => None,
            other => Some(other as u32),
        };
        let Some(code) = code else {
            continue;
        };
        match (high_surrogate.take(), code) {
            (None, 0xD800..=0xDBFF) => high_surrogate = Some(code),
            (Some(high), 0xDC00..=0xDFFF) => {
                let combined = 0x10000 + ((high - 0xD800) << 10) + (code - 0xDC00);
                out.extend(char::from_u32(combined));
            }
            _ => {
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
    }
    if high_surrogate.is_some() {
        out.push(char::REPLACEMENT_CHARACTER);
    }
    out
}
