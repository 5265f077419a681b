//! Every function-valued definition of a program, with its kind and name.

use crate::extract::variables::ExtractedVariable;
use crate::guards::{MemberShape, is_identifier, is_member_expression};
use crate::traverse::{Control, Visitors, traverse};
use ecmalens_core::ast::{
    Accessibility, Field, MethodKind, Node, NodeFlags, NodeKind, VariableKind,
};

/// How a function came to be defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// `function f() {}`
    Declaration,
    /// `const f = () => {}` or `const f = function () {}`
    Expression,
    /// `{ f: () => {} }` or `{ f() {} }`
    Property,
    Getter,
    Setter,
    Constructor,
    Method,
    /// `class K { f = () => {} }`
    ClassProperty,
    /// `K.prototype.f = function () {}`
    PrototypeAssignment,
}

impl FunctionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FunctionKind::Declaration => "declaration",
            FunctionKind::Expression => "expression",
            FunctionKind::Property => "property",
            FunctionKind::Getter => "getter",
            FunctionKind::Setter => "setter",
            FunctionKind::Constructor => "constructor",
            FunctionKind::Method => "method",
            FunctionKind::ClassProperty => "class-property",
            FunctionKind::PrototypeAssignment => "prototype-assignment",
        }
    }
}

impl From<MethodKind> for FunctionKind {
    fn from(kind: MethodKind) -> Self {
        match kind {
            MethodKind::Get => FunctionKind::Getter,
            MethodKind::Set => FunctionKind::Setter,
            MethodKind::Constructor => FunctionKind::Constructor,
            MethodKind::Method => FunctionKind::Method,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionMetadata<'a> {
    pub is_async: bool,
    pub is_generator: bool,
    /// Arrow function with an expression body.
    pub is_expression: bool,
    /// Set for class members only.
    pub is_static: Option<bool>,
    pub accessibility: Option<Accessibility>,
    pub params: Vec<&'a Node>,
    /// The binding a function expression is assigned to.
    pub variable: Option<ExtractedVariable<'a>>,
    /// Owning class of methods, class properties and prototype assignments.
    pub klass: Option<&'a str>,
}

impl<'a> FunctionMetadata<'a> {
    fn of(function: &'a Node) -> Self {
        Self {
            is_async: function.has_flag(NodeFlags::ASYNC),
            is_generator: function.has_flag(NodeFlags::GENERATOR),
            is_expression: function.has_flag(NodeFlags::EXPRESSION),
            is_static: None,
            accessibility: None,
            params: function.children_of(Field::Params).collect(),
            variable: None,
            klass: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFunction<'a> {
    /// The defining construct: declaration, declarator, property, class
    /// member or assignment.
    pub node: &'a Node,
    pub name: Option<&'a str>,
    pub kind: FunctionKind,
    /// The function node itself.
    pub function: &'a Node,
    pub metadata: FunctionMetadata<'a>,
}

impl<'a> ExtractedFunction<'a> {
    fn new(node: &'a Node, name: Option<&'a str>, kind: FunctionKind, function: &'a Node) -> Self {
        Self {
            node,
            name,
            kind,
            function,
            metadata: FunctionMetadata::of(function),
        }
    }

    pub fn body(&self) -> Option<&'a Node> {
        self.function.child(Field::Body)
    }

    pub fn params(&self) -> &[&'a Node] {
        &self.metadata.params
    }

    pub fn is_async(&self) -> bool {
        self.metadata.is_async
    }

    pub fn is_generator(&self) -> bool {
        self.metadata.is_generator
    }
}

fn is_function_value(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::ArrowFunctionExpression | NodeKind::FunctionExpression
    )
}

/// Name of a non-computed identifier key.
fn key_name(member: &Node) -> Option<&str> {
    if member.has_flag(NodeFlags::COMPUTED) {
        return None;
    }
    member
        .child(Field::Key)
        .filter(|key| is_identifier(key, None))
        .and_then(Node::name)
}

/// Functions defined under `root`, in source order.
///
/// Once a definition is recognized its subtree is not searched further, so
/// functions nested inside a recognized function are not reported.
pub fn extract_functions<'a>(root: &'a Node) -> Vec<ExtractedFunction<'a>> {
    let mut functions = Vec::new();
    let visitors = Visitors::new()
        .on(
            NodeKind::FunctionDeclaration,
            |functions: &mut Vec<ExtractedFunction<'a>>, ctl, node, _| {
                ctl.skip();
                let name = node.child(Field::Id).and_then(Node::name);
                functions.push(ExtractedFunction::new(
                    node,
                    name,
                    FunctionKind::Declaration,
                    node,
                ));
            },
        )
        .on(NodeKind::VariableDeclaration, |functions, ctl, node, _| {
            let kind = node.props.declaration_kind.unwrap_or(VariableKind::Var);
            for declarator in node.children_of(Field::Declarations) {
                let (Some(id), Some(init)) = (
                    declarator.child(Field::Id),
                    declarator.child(Field::Init).filter(|init| is_function_value(init)),
                ) else {
                    continue;
                };
                ctl.skip();
                let name = if is_identifier(id, None) { id.name() } else { None };
                let mut function =
                    ExtractedFunction::new(declarator, name, FunctionKind::Expression, init);
                function.metadata.variable = Some(ExtractedVariable {
                    node,
                    binding: id,
                    kind,
                    init: Some(init),
                });
                functions.push(function);
            }
        })
        .on(NodeKind::ClassDeclaration, class_members)
        .on(NodeKind::ClassExpression, class_members)
        .on(NodeKind::Property, |functions, ctl, node, _| {
            let Some(value) = node.child(Field::Value).filter(|v| is_function_value(v)) else {
                return;
            };
            ctl.skip();
            functions.push(ExtractedFunction::new(
                node,
                key_name(node),
                FunctionKind::Property,
                value,
            ));
        })
        .on(NodeKind::AssignmentExpression, |functions, ctl, node, _| {
            if let Some(function) = prototype_assignment(node) {
                ctl.skip();
                functions.push(function);
            }
        });
    traverse(root, visitors, &mut functions);
    tracing::trace!("extracted {} functions", functions.len());
    functions
}

fn class_members<'a>(
    functions: &mut Vec<ExtractedFunction<'a>>,
    ctl: &mut Control<'a>,
    class: &'a Node,
    _parent: Option<&'a Node>,
) {
    ctl.skip();
    let klass = class.child(Field::Id).and_then(Node::name);
    let Some(body) = class.child(Field::Body) else {
        return;
    };
    for member in body.children_of(Field::Body) {
        let Some(value) = member.child(Field::Value).filter(|v| is_function_value(v)) else {
            continue;
        };
        let kind = match member.kind {
            NodeKind::MethodDefinition => member
                .props
                .method_kind
                .map_or(FunctionKind::Method, FunctionKind::from),
            NodeKind::PropertyDefinition => FunctionKind::ClassProperty,
            _ => continue,
        };
        let mut function = ExtractedFunction::new(member, key_name(member), kind, value);
        function.metadata.is_static = Some(member.has_flag(NodeFlags::STATIC));
        function.metadata.accessibility = member.props.accessibility;
        function.metadata.klass = klass;
        functions.push(function);
    }
}

/// `Klass.prototype.name = function () {}`
fn prototype_assignment(node: &Node) -> Option<ExtractedFunction<'_>> {
    if node.operator() != Some("=") {
        return None;
    }
    let left = node
        .child(Field::Left)
        .filter(|l| is_member_expression(l, MemberShape::any()))?;
    let right = node.child(Field::Right).filter(|r| is_function_value(r))?;
    let prototype = left.child(Field::Object).filter(|o| {
        o.is(NodeKind::MemberExpression)
            && o.child(Field::Property)
                .is_some_and(|p| is_identifier(p, Some("prototype")))
    })?;
    let klass = prototype
        .child(Field::Object)
        .filter(|o| is_identifier(o, None))?;
    let name = left
        .child(Field::Property)
        .filter(|p| is_identifier(p, None))?;

    let mut function =
        ExtractedFunction::new(node, name.name(), FunctionKind::PrototypeAssignment, right);
    function.metadata.klass = klass.name();
    Some(function)
}
