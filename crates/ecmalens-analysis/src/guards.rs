//! Structural predicates over single nodes.
//!
//! Optional arguments narrow the match; `None` means "any".

use ecmalens_core::ast::{Field, LiteralValue, Node, NodeKind, VariableKind};

/// A member property to match: an identifier name or a literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Key<'p> {
    Name(&'p str),
    Index(f64),
}

impl<'p> From<&'p str> for Key<'p> {
    fn from(name: &'p str) -> Self {
        Key::Name(name)
    }
}

impl From<f64> for Key<'_> {
    fn from(index: f64) -> Self {
        Key::Index(index)
    }
}

impl Key<'_> {
    fn matches(self, property: &Node) -> bool {
        match self {
            Key::Name(name) => {
                is_identifier(property, Some(name))
                    || literal_value(property).and_then(LiteralValue::as_str) == Some(name)
            }
            Key::Index(index) => {
                matches!(literal_value(property), Some(LiteralValue::Number(n)) if *n == index)
            }
        }
    }
}

/// Shape of `object.property`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemberShape<'p> {
    pub object: Option<&'p str>,
    pub property: Option<Key<'p>>,
}

impl<'p> MemberShape<'p> {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn object(object: &'p str) -> Self {
        Self {
            object: Some(object),
            property: None,
        }
    }

    pub fn property(property: impl Into<Key<'p>>) -> Self {
        Self {
            object: None,
            property: Some(property.into()),
        }
    }

    pub fn member(object: &'p str, property: impl Into<Key<'p>>) -> Self {
        Self {
            object: Some(object),
            property: Some(property.into()),
        }
    }
}

/// Shape of a call's callee.
///
/// With only `object` set, both `object(...)` and `object.any(...)` match.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CallShape<'p> {
    pub object: Option<&'p str>,
    pub property: Option<Key<'p>>,
}

impl<'p> CallShape<'p> {
    pub fn any() -> Self {
        Self::default()
    }

    /// `name(...)`, or `name.anything(...)`.
    pub fn callee(name: &'p str) -> Self {
        Self {
            object: Some(name),
            property: None,
        }
    }

    /// `anything.property(...)`.
    pub fn property(property: impl Into<Key<'p>>) -> Self {
        Self {
            object: None,
            property: Some(property.into()),
        }
    }

    /// `object.property(...)`.
    pub fn member(object: &'p str, property: impl Into<Key<'p>>) -> Self {
        Self {
            object: Some(object),
            property: Some(property.into()),
        }
    }
}

fn literal_value(node: &Node) -> Option<&LiteralValue> {
    if node.is(NodeKind::Literal) {
        node.props.value.as_ref()
    } else {
        None
    }
}

pub fn is_identifier(node: &Node, name: Option<&str>) -> bool {
    node.is(NodeKind::Identifier) && name.is_none_or(|name| node.name() == Some(name))
}

pub fn is_literal(node: &Node, value: Option<&LiteralValue>, raw: Option<&str>) -> bool {
    node.is(NodeKind::Literal)
        && value.is_none_or(|value| node.props.value.as_ref() == Some(value))
        && raw.is_none_or(|raw| node.props.raw.as_deref() == Some(raw))
}

pub fn is_member_expression(node: &Node, shape: MemberShape) -> bool {
    node.is(NodeKind::MemberExpression)
        && shape.object.is_none_or(|object| {
            node.child(Field::Object)
                .is_some_and(|o| is_identifier(o, Some(object)))
        })
        && shape.property.is_none_or(|property| {
            node.child(Field::Property)
                .is_some_and(|p| property.matches(p))
        })
}

pub fn is_call_expression(node: &Node, shape: CallShape) -> bool {
    if !node.is(NodeKind::CallExpression) {
        return false;
    }
    let Some(callee) = node.child(Field::Callee) else {
        return false;
    };
    if let (Some(object), None) = (shape.object, shape.property)
        && is_identifier(callee, Some(object))
    {
        return true;
    }
    if shape.object.is_none() && shape.property.is_none() {
        return true;
    }
    is_member_expression(
        callee,
        MemberShape {
            object: shape.object,
            property: shape.property,
        },
    )
}

pub fn is_new_expression(node: &Node, callee: Option<&str>) -> bool {
    node.is(NodeKind::NewExpression)
        && callee.is_none_or(|name| {
            node.child(Field::Callee)
                .is_some_and(|c| is_identifier(c, Some(name)))
        })
}

pub fn is_binary_expression(node: &Node, operator: Option<&str>) -> bool {
    node.is(NodeKind::BinaryExpression) && operator.is_none_or(|op| node.operator() == Some(op))
}

pub fn is_logical_expression(node: &Node, operator: Option<&str>) -> bool {
    node.is(NodeKind::LogicalExpression) && operator.is_none_or(|op| node.operator() == Some(op))
}

pub fn is_unary_expression(node: &Node, operator: Option<&str>) -> bool {
    node.is(NodeKind::UnaryExpression) && operator.is_none_or(|op| node.operator() == Some(op))
}

/// `left = default`, optionally requiring the default to be a string literal
/// with `value` or an identifier named `value`.
pub fn is_assignment_pattern(node: &Node, value: Option<&str>) -> bool {
    node.is(NodeKind::AssignmentPattern)
        && value.is_none_or(|value| {
            node.child(Field::Right).is_some_and(|right| {
                is_literal(right, Some(&LiteralValue::from(value)), None)
                    || is_identifier(right, Some(value))
            })
        })
}

pub fn is_variable_declaration_of_kind(node: &Node, kinds: &[VariableKind]) -> bool {
    node.is(NodeKind::VariableDeclaration)
        && node
            .props
            .declaration_kind
            .is_some_and(|kind| kinds.contains(&kind))
}

pub fn is_return_statement_with_value(node: &Node) -> bool {
    node.is(NodeKind::ReturnStatement) && node.child(Field::Argument).is_some()
}

/// A block whose only statement is a `return`.
pub fn is_return_block_statement(node: &Node) -> bool {
    node.is(NodeKind::BlockStatement)
        && matches!(
            node.list(Field::Body),
            [Some(only)] if only.is(NodeKind::ReturnStatement)
        )
}

/// Template literal, optionally requiring its quasis' raw texts to match
/// `quasis` position by position.
pub fn is_template_literal(node: &Node, quasis: Option<&[&str]>) -> bool {
    node.is(NodeKind::TemplateLiteral)
        && quasis.is_none_or(|expected| {
            node.children_of(Field::Quasis)
                .enumerate()
                .all(|(i, quasi)| {
                    expected.get(i).copied() == quasi.props.raw.as_deref()
                })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Node {
        let mut node = Node::new(NodeKind::Identifier);
        node.props.name = Some(name.to_string());
        node
    }

    fn string(value: &str) -> Node {
        let mut node = Node::new(NodeKind::Literal);
        node.props.value = Some(LiteralValue::from(value));
        node.props.raw = Some(format!("'{value}'"));
        node
    }

    #[test]
    fn test_member_property_matches_identifier_or_literal() {
        let dotted = Node::new(NodeKind::MemberExpression)
            .with(Field::Object, ident("module"))
            .with(Field::Property, ident("exports"));
        let indexed = Node::new(NodeKind::MemberExpression)
            .with(Field::Object, ident("module"))
            .with(Field::Property, string("exports"));

        for node in [&dotted, &indexed] {
            assert!(is_member_expression(node, MemberShape::member("module", "exports")));
            assert!(is_member_expression(node, MemberShape::property("exports")));
            assert!(!is_member_expression(node, MemberShape::object("exports")));
        }
    }

    #[test]
    fn test_call_with_object_only_accepts_plain_callee() {
        let plain = Node::new(NodeKind::CallExpression).with(Field::Callee, ident("describe"));
        let member = Node::new(NodeKind::CallExpression).with(
            Field::Callee,
            Node::new(NodeKind::MemberExpression)
                .with(Field::Object, ident("describe"))
                .with(Field::Property, ident("skip")),
        );

        assert!(is_call_expression(&plain, CallShape::callee("describe")));
        assert!(is_call_expression(&member, CallShape::callee("describe")));
        assert!(is_call_expression(&member, CallShape::member("describe", "skip")));
        assert!(!is_call_expression(&plain, CallShape::member("describe", "skip")));
        assert!(is_call_expression(&plain, CallShape::any()));
    }
}
