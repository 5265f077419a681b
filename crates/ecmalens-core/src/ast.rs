//! ESTree-shaped node model.
//!
//! Every node is a [`Node`] tagged with a closed [`NodeKind`]. Child nodes live
//! in named slots ([`Field`]); the order in which a kind's slots are visited is
//! fixed by the static table behind [`NodeKind::child_fields`], so traversal
//! never needs per-kind code. Scalar data (names, literal values, operators,
//! modifiers) lives in [`Props`].

use bitflags::bitflags;
use serde::Serialize;
use std::fmt;

/// Identity of a node within one parsed tree (pre-order index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

/// Half-open `[start, end)` byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

macro_rules! node_kinds {
    ($($kind:ident => [$($field:ident),* $(,)?]),+ $(,)?) => {
        /// Discriminant of a syntax node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum NodeKind {
            $($kind),+
        }

        impl NodeKind {
            /// The ESTree `type` string for this kind.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind)),+
                }
            }

            /// Child slots of this kind, in visiting order.
            pub fn child_fields(self) -> &'static [Field] {
                match self {
                    $(NodeKind::$kind => &[$(Field::$field),*]),+
                }
            }
        }
    };
}

node_kinds! {
    Program => [Body],

    // Statements
    ExpressionStatement => [Expression],
    BlockStatement => [Body],
    EmptyStatement => [],
    DebuggerStatement => [],
    ReturnStatement => [Argument],
    ThrowStatement => [Argument],
    IfStatement => [Test, Consequent, Alternate],
    SwitchStatement => [Discriminant, Cases],
    SwitchCase => [Test, Consequent],
    WhileStatement => [Test, Body],
    DoWhileStatement => [Body, Test],
    ForStatement => [Init, Test, Update, Body],
    ForInStatement => [Left, Right, Body],
    ForOfStatement => [Left, Right, Body],
    BreakStatement => [Label],
    ContinueStatement => [Label],
    LabeledStatement => [Label, Body],
    TryStatement => [Block, Handler, Finalizer],
    CatchClause => [Param, Body],

    // Declarations
    VariableDeclaration => [Declarations],
    VariableDeclarator => [Id, Init],
    FunctionDeclaration => [Id, Params, Body],
    ClassDeclaration => [Id, SuperClass, Body],
    ClassBody => [Body],
    MethodDefinition => [Key, Value],
    PropertyDefinition => [Key, Value],
    StaticBlock => [Body],

    // Modules
    ImportDeclaration => [Specifiers, Source],
    ImportSpecifier => [Imported, Local],
    ImportDefaultSpecifier => [Local],
    ImportNamespaceSpecifier => [Local],
    ExportNamedDeclaration => [Declaration, Specifiers, Source],
    ExportSpecifier => [Local, Exported],
    ExportDefaultDeclaration => [Declaration],
    ExportAllDeclaration => [Exported, Source],

    // Expressions
    Identifier => [],
    PrivateIdentifier => [],
    Literal => [],
    TemplateLiteral => [Quasis, Expressions],
    TemplateElement => [],
    TaggedTemplateExpression => [Tag, Quasi],
    ThisExpression => [],
    Super => [],
    ArrayExpression => [Elements],
    ObjectExpression => [Properties],
    Property => [Key, Value],
    SpreadElement => [Argument],
    FunctionExpression => [Id, Params, Body],
    ArrowFunctionExpression => [Params, Body],
    ClassExpression => [Id, SuperClass, Body],
    UnaryExpression => [Argument],
    UpdateExpression => [Argument],
    BinaryExpression => [Left, Right],
    LogicalExpression => [Left, Right],
    AssignmentExpression => [Left, Right],
    ConditionalExpression => [Test, Consequent, Alternate],
    CallExpression => [Callee, Arguments],
    NewExpression => [Callee, Arguments],
    MemberExpression => [Object, Property],
    SequenceExpression => [Expressions],
    AwaitExpression => [Argument],
    YieldExpression => [Argument],
    ImportExpression => [Source],

    // Patterns
    ArrayPattern => [Elements],
    ObjectPattern => [Properties],
    AssignmentPattern => [Left, Right],
    RestElement => [Argument],

    // TypeScript
    TSInterfaceDeclaration => [Id],
    TSTypeAliasDeclaration => [Id],
    TSEnumDeclaration => [Id],
    TSModuleDeclaration => [Id, Body],
    TSModuleBlock => [Body],
    TSAsExpression => [Expression],
    TSSatisfiesExpression => [Expression],
    TSNonNullExpression => [Expression],
    TSTypeAssertion => [Expression],

    // Anything the lowering does not model: JSX, decorators, type-level
    // constructs outside declarations. Keeps its lowered named children.
    Unknown => [Children],
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named child slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Body,
    Expression,
    Argument,
    Test,
    Consequent,
    Alternate,
    Discriminant,
    Cases,
    Init,
    Update,
    Left,
    Right,
    Label,
    Block,
    Handler,
    Finalizer,
    Param,
    Declarations,
    Id,
    Params,
    SuperClass,
    Key,
    Value,
    Quasis,
    Expressions,
    Tag,
    Quasi,
    Elements,
    Properties,
    Callee,
    Arguments,
    Object,
    Property,
    Source,
    Specifiers,
    Imported,
    Local,
    Exported,
    Declaration,
    Children,
}

/// Contents of a child slot: a single node, or an ordered list where `None`
/// marks a hole (`[a, , b]`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Slot {
    One(Box<Node>),
    Many(Vec<Option<Node>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    RegExp { pattern: String, flags: String },
    BigInt(String),
}

impl LiteralValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Boolean(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub const ALL: [VariableKind; 3] = [VariableKind::Var, VariableKind::Let, VariableKind::Const];

    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }

    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "var" => Some(VariableKind::Var),
            "let" => Some(VariableKind::Let),
            "const" => Some(VariableKind::Const),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessibility {
    Public,
    Protected,
    Private,
}

impl Accessibility {
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Accessibility::Public),
            "protected" => Some(Accessibility::Protected),
            "private" => Some(Accessibility::Private),
            _ => None,
        }
    }
}

/// `exportKind` of import/export declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Value,
    Type,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct NodeFlags: u16 {
        const ASYNC = 1 << 0;
        const GENERATOR = 1 << 1;
        /// Arrow function with an expression body.
        const EXPRESSION = 1 << 2;
        const STATIC = 1 << 3;
        const COMPUTED = 1 << 4;
        const SHORTHAND = 1 << 5;
        /// Object literal method (`{ foo() {} }`).
        const METHOD = 1 << 6;
        const OPTIONAL = 1 << 7;
        const DECLARE = 1 << 8;
        /// Prefix update (`++i`), `for await`, `yield*`.
        const PREFIX = 1 << 9;
        const DELEGATE = 1 << 10;
        const AWAIT = 1 << 11;
    }
}

/// Scalar node data. Which fields are meaningful depends on the kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Props {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<LiteralValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration_kind: Option<VariableKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_kind: Option<MethodKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_kind: Option<PropertyKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_kind: Option<ExportKind>,
    #[serde(skip_serializing_if = "NodeFlags::is_empty")]
    pub flags: NodeFlags,
    /// Grammar kind of an [`NodeKind::Unknown`] node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
    #[serde(flatten)]
    pub props: Props,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    slots: Vec<(Field, Slot)>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId(0),
            kind,
            range: None,
            loc: None,
            props: Props::default(),
            slots: Vec::new(),
        }
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    pub fn has_flag(&self, flag: NodeFlags) -> bool {
        self.props.flags.contains(flag)
    }

    /// `name` of identifiers.
    pub fn name(&self) -> Option<&str> {
        self.props.name.as_deref()
    }

    pub fn operator(&self) -> Option<&str> {
        self.props.operator.as_deref()
    }

    pub fn slot(&self, field: Field) -> Option<&Slot> {
        self.slots
            .iter()
            .find_map(|(f, slot)| (*f == field).then_some(slot))
    }

    /// The single node held in `field`, if any.
    pub fn child(&self, field: Field) -> Option<&Node> {
        match self.slot(field)? {
            Slot::One(node) => Some(node),
            Slot::Many(_) => None,
        }
    }

    /// The list held in `field`, holes included. Empty when absent.
    pub fn list(&self, field: Field) -> &[Option<Node>] {
        match self.slot(field) {
            Some(Slot::Many(items)) => items,
            _ => &[],
        }
    }

    /// Every node held in `field`, skipping holes.
    pub fn children_of(&self, field: Field) -> impl Iterator<Item = &Node> {
        let (one, many) = match self.slot(field) {
            Some(Slot::One(node)) => (Some(node.as_ref()), &[][..]),
            Some(Slot::Many(items)) => (None, items.as_slice()),
            None => (None, &[][..]),
        };
        one.into_iter().chain(many.iter().flatten())
    }

    /// All children in visiting order.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.kind
            .child_fields()
            .iter()
            .flat_map(move |field| self.children_of(*field))
    }

    /// Store `node` in `field`, replacing what was there.
    pub fn set(&mut self, field: Field, slot: Slot) {
        if let Some(existing) = self.slots.iter_mut().find(|(f, _)| *f == field) {
            existing.1 = slot;
        } else {
            self.slots.push((field, slot));
        }
    }

    pub fn with(mut self, field: Field, node: Node) -> Self {
        self.set(field, Slot::One(Box::new(node)));
        self
    }

    pub fn with_opt(self, field: Field, node: Option<Node>) -> Self {
        match node {
            Some(node) => self.with(field, node),
            None => self,
        }
    }

    pub fn with_list(mut self, field: Field, items: Vec<Option<Node>>) -> Self {
        self.set(field, Slot::Many(items));
        self
    }

    pub fn with_nodes(self, field: Field, nodes: Vec<Node>) -> Self {
        self.with_list(field, nodes.into_iter().map(Some).collect())
    }

    pub fn take(&mut self, field: Field) -> Option<Slot> {
        let index = self.slots.iter().position(|(f, _)| *f == field)?;
        Some(self.slots.remove(index).1)
    }

    /// Renumber this subtree in pre-order starting at `next`.
    pub fn number(&mut self, next: &mut u32) {
        self.id = NodeId(*next);
        *next += 1;
        let fields = self.kind.child_fields();
        // Visit in declared field order, not storage order.
        for field in fields {
            if let Some((_, slot)) = self.slots.iter_mut().find(|(f, _)| f == field) {
                match slot {
                    Slot::One(node) => node.number(next),
                    Slot::Many(items) => {
                        for node in items.iter_mut().flatten() {
                            node.number(next);
                        }
                    }
                }
            }
        }
    }

    /// Number of nodes in this subtree, this node included.
    pub fn size(&self) -> usize {
        1 + self.children().map(Node::size).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Node {
        let mut node = Node::new(NodeKind::Identifier);
        node.props.name = Some(name.to_string());
        node
    }

    #[test]
    fn test_children_follow_field_order_and_skip_holes() {
        // Slots inserted out of order on purpose.
        let mut pattern = Node::new(NodeKind::ArrayPattern)
            .with_list(Field::Elements, vec![None, Some(ident("a")), None, Some(ident("b"))]);
        let declarator = Node::new(NodeKind::VariableDeclarator)
            .with(Field::Init, ident("value"))
            .with(Field::Id, pattern.clone());

        let names: Vec<_> = declarator.children().map(|n| n.kind).collect();
        assert_eq!(names, vec![NodeKind::ArrayPattern, NodeKind::Identifier]);

        let elements: Vec<_> = pattern.children().filter_map(Node::name).collect();
        assert_eq!(elements, vec!["a", "b"]);
        assert_eq!(pattern.list(Field::Elements).len(), 4);

        let mut next = 0;
        pattern.number(&mut next);
        assert_eq!(next, 3);
        assert_eq!(pattern.id, NodeId(0));
    }

    #[test]
    fn test_child_field_table() {
        assert!(NodeKind::Identifier.child_fields().is_empty());
        assert_eq!(NodeKind::MemberExpression.as_str(), "MemberExpression");
        assert_eq!(
            NodeKind::ForStatement.child_fields(),
            &[Field::Init, Field::Test, Field::Update, Field::Body]
        );
    }
}
