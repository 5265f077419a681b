//! Exported bindings of a module, ES and CommonJS style.
//!
//! Only statements directly under the program are inspected. Assignments to
//! `module.exports` inside functions or blocks are not recognized.

use crate::guards::{MemberShape, is_identifier, is_member_expression};
use crate::traverse::{Visitors, traverse};
use ecmalens_core::ast::{Field, LiteralValue, Node, NodeKind};

/// Local name used for default exports without a name.
pub const ANONYMOUS: &str = "__anonymous";

/// Whether the export binds a value or only a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Value,
    Type,
    Unknown,
}

impl ExportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportKind::Value => "value",
            ExportKind::Type => "type",
            ExportKind::Unknown => "unknown",
        }
    }
}

/// What kind of declaration is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Class,
    Variable,
    Interface,
    Type,
    Function,
    Identifier,
    Unknown,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Variable => "variable",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Type => "type",
            DeclarationKind::Function => "function",
            DeclarationKind::Identifier => "identifier",
            DeclarationKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedExport<'a> {
    /// The export statement (or CommonJS assignment statement).
    pub node: &'a Node,
    pub local: String,
    pub exported: String,
    pub export_kind: ExportKind,
    pub kind: DeclarationKind,
}

impl ExtractedExport<'_> {
    /// Name of the exported binding in this module; same as `local`.
    pub fn name(&self) -> &str {
        &self.local
    }
}

pub fn extract_exports<'a>(root: &'a Node) -> Vec<ExtractedExport<'a>> {
    let mut exports = Vec::new();
    traverse(
        root,
        Visitors::new().enter(|exports: &mut Vec<ExtractedExport<'a>>, ctl, node, _| {
            if !node.is(NodeKind::Program) {
                ctl.skip();
            }
            match node.kind {
                NodeKind::ExportNamedDeclaration => named(node, exports),
                NodeKind::ExportAllDeclaration => {
                    let exported = node
                        .child(Field::Exported)
                        .and_then(module_name)
                        .unwrap_or("*");
                    exports.push(record(
                        node,
                        "*",
                        exported,
                        ExportKind::Unknown,
                        DeclarationKind::Unknown,
                    ));
                }
                NodeKind::ExportDefaultDeclaration => default(node, exports),
                NodeKind::ExpressionStatement => commonjs(node, exports),
                _ => {}
            }
        }),
        &mut exports,
    );
    exports
}

fn record<'a>(
    node: &'a Node,
    local: &str,
    exported: &str,
    export_kind: ExportKind,
    kind: DeclarationKind,
) -> ExtractedExport<'a> {
    ExtractedExport {
        node,
        local: local.to_string(),
        exported: exported.to_string(),
        export_kind,
        kind,
    }
}

/// Identifier name or string-literal value (`export { "a-b" as c }`).
fn module_name(node: &Node) -> Option<&str> {
    match node.kind {
        NodeKind::Identifier => node.name(),
        NodeKind::Literal => node.props.value.as_ref().and_then(LiteralValue::as_str),
        _ => None,
    }
}

fn declared_name(declaration: &Node) -> Option<&str> {
    declaration.child(Field::Id).and_then(Node::name)
}

fn is_function_value(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::ArrowFunctionExpression | NodeKind::FunctionExpression
    )
}

fn named<'a>(node: &'a Node, exports: &mut Vec<ExtractedExport<'a>>) {
    let Some(declaration) = node.child(Field::Declaration) else {
        let source = node
            .child(Field::Source)
            .and_then(|s| s.props.value.as_ref())
            .and_then(LiteralValue::as_str);
        for specifier in node.children_of(Field::Specifiers) {
            let local = specifier.child(Field::Local).and_then(module_name);
            let exported = specifier.child(Field::Exported).and_then(module_name);
            let (Some(local), Some(exported)) = (local, exported) else {
                continue;
            };
            let local = match source {
                Some(source) => format!("{source}.{local}"),
                None => local.to_string(),
            };
            exports.push(record(
                node,
                &local,
                exported,
                ExportKind::Unknown,
                DeclarationKind::Unknown,
            ));
        }
        return;
    };

    match declaration.kind {
        NodeKind::ClassDeclaration | NodeKind::FunctionDeclaration => {
            let kind = if declaration.is(NodeKind::ClassDeclaration) {
                DeclarationKind::Class
            } else {
                DeclarationKind::Function
            };
            if let Some(name) = declared_name(declaration) {
                exports.push(record(node, name, name, ExportKind::Value, kind));
            }
        }
        NodeKind::VariableDeclaration => {
            for declarator in declaration.children_of(Field::Declarations) {
                // Destructuring exports are not supported.
                let Some(id) = declarator.child(Field::Id).filter(|id| is_identifier(id, None))
                else {
                    continue;
                };
                let name = id.name().unwrap_or_default();
                let kind = if declarator.child(Field::Init).is_some_and(is_function_value) {
                    DeclarationKind::Function
                } else {
                    DeclarationKind::Variable
                };
                exports.push(record(node, name, name, ExportKind::Value, kind));
            }
        }
        NodeKind::TSInterfaceDeclaration => {
            if let Some(name) = declared_name(declaration) {
                exports.push(record(
                    node,
                    name,
                    name,
                    ExportKind::Type,
                    DeclarationKind::Interface,
                ));
            }
        }
        NodeKind::TSTypeAliasDeclaration => {
            if let Some(name) = declared_name(declaration) {
                exports.push(record(
                    node,
                    name,
                    name,
                    ExportKind::Type,
                    DeclarationKind::Type,
                ));
            }
        }
        _ => {}
    }
}

fn default<'a>(node: &'a Node, exports: &mut Vec<ExtractedExport<'a>>) {
    let Some(declaration) = node.child(Field::Declaration) else {
        return;
    };
    let export = match declaration.kind {
        NodeKind::Identifier => record(
            node,
            declaration.name().unwrap_or_default(),
            "default",
            ExportKind::Unknown,
            DeclarationKind::Identifier,
        ),
        NodeKind::ClassDeclaration => record(
            node,
            declared_name(declaration).unwrap_or(ANONYMOUS),
            "default",
            ExportKind::Value,
            DeclarationKind::Class,
        ),
        NodeKind::FunctionDeclaration => record(
            node,
            declared_name(declaration).unwrap_or(ANONYMOUS),
            "default",
            ExportKind::Value,
            DeclarationKind::Function,
        ),
        NodeKind::ArrowFunctionExpression => record(
            node,
            ANONYMOUS,
            "default",
            ExportKind::Value,
            DeclarationKind::Function,
        ),
        NodeKind::TSInterfaceDeclaration => record(
            node,
            declared_name(declaration).unwrap_or(ANONYMOUS),
            "default",
            ExportKind::Type,
            DeclarationKind::Interface,
        ),
        // Object and array literals are recognized but not supported.
        _ => return,
    };
    exports.push(export);
}

/// `module.exports = { ... }`, `module.exports.k = v` and `exports.k = v`.
fn commonjs<'a>(statement: &'a Node, exports: &mut Vec<ExtractedExport<'a>>) {
    let Some(assignment) = statement
        .child(Field::Expression)
        .filter(|e| e.is(NodeKind::AssignmentExpression) && e.operator() == Some("="))
    else {
        return;
    };
    let (Some(left), Some(right)) = (assignment.child(Field::Left), assignment.child(Field::Right))
    else {
        return;
    };

    if is_member_expression(left, MemberShape::member("module", "exports")) {
        if right.is(NodeKind::ObjectExpression) {
            for property in right.children_of(Field::Properties) {
                if !property.is(NodeKind::Property) {
                    continue;
                }
                let key = property.child(Field::Key).filter(|k| is_identifier(k, None));
                let value = property.child(Field::Value).filter(|v| is_identifier(v, None));
                if let (Some(key), Some(value)) =
                    (key.and_then(Node::name), value.and_then(Node::name))
                {
                    exports.push(record(
                        statement,
                        value,
                        key,
                        ExportKind::Value,
                        DeclarationKind::Unknown,
                    ));
                }
            }
        }
        return;
    }

    if !is_member_expression(left, MemberShape::any()) {
        return;
    }
    let exported_from_module = left
        .child(Field::Object)
        .is_some_and(|object| {
            is_member_expression(object, MemberShape::member("module", "exports"))
                || is_identifier(object, Some("exports"))
        });
    let Some(key) = left
        .child(Field::Property)
        .filter(|p| is_identifier(p, None))
        .and_then(Node::name)
    else {
        return;
    };
    if !exported_from_module {
        return;
    }

    let (local, kind) = if is_identifier(right, None) {
        (right.name().unwrap_or(key), DeclarationKind::Identifier)
    } else if right.is(NodeKind::FunctionExpression) {
        // Inline named functions export under their own name.
        (declared_name(right).unwrap_or(key), DeclarationKind::Function)
    } else {
        (key, DeclarationKind::Unknown)
    };
    exports.push(record(statement, local, key, ExportKind::Value, kind));
}
