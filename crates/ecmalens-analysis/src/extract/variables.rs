//! Variable bindings declared with `var`, `let` or `const`, at any depth.

use crate::guards::is_identifier;
use crate::queries::find_all;
use ecmalens_core::ast::{Field, Node, NodeKind, VariableKind};

/// One identifier bound by a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedVariable<'a> {
    /// The enclosing `VariableDeclaration`.
    pub node: &'a Node,
    /// The bound identifier.
    pub binding: &'a Node,
    pub kind: VariableKind,
    /// Initializer of the declarator, shared by every binding of an array
    /// pattern.
    pub init: Option<&'a Node>,
}

impl<'a> ExtractedVariable<'a> {
    pub fn name(&self) -> Option<&'a str> {
        self.binding.name()
    }

    pub fn initialized(&self) -> bool {
        self.init.is_some()
    }
}

/// All variable bindings under `root`, in source order.
///
/// Plain identifiers and the identifier elements of array patterns are
/// reported. Object patterns and nested patterns are not.
pub fn extract_variables<'a>(root: &'a Node) -> Vec<ExtractedVariable<'a>> {
    let mut variables = Vec::new();
    for declaration in find_all(root, |_, node| node.is(NodeKind::VariableDeclaration)) {
        let kind = declaration
            .props
            .declaration_kind
            .unwrap_or(VariableKind::Var);
        for declarator in declaration.children_of(Field::Declarations) {
            let Some(id) = declarator.child(Field::Id) else {
                continue;
            };
            let init = declarator.child(Field::Init);
            let record = |binding: &'a Node| ExtractedVariable {
                node: declaration,
                binding,
                kind,
                init,
            };
            match id.kind {
                NodeKind::Identifier => variables.push(record(id)),
                NodeKind::ArrayPattern => variables.extend(
                    id.children_of(Field::Elements)
                        .filter(|element| is_identifier(element, None))
                        .map(record),
                ),
                _ => {}
            }
        }
    }
    tracing::trace!("extracted {} variables", variables.len());
    variables
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
    fn test_array_pattern_holes_are_skipped() {
        let pattern = Node::new(NodeKind::ArrayPattern)
            .with_list(Field::Elements, vec![Some(ident("a")), None, Some(ident("b"))]);
        let mut declaration = Node::new(NodeKind::VariableDeclaration).with_nodes(
            Field::Declarations,
            vec![Node::new(NodeKind::VariableDeclarator).with(Field::Id, pattern)],
        );
        declaration.props.declaration_kind = Some(VariableKind::Let);

        let variables = extract_variables(&declaration);
        let names: Vec<_> = variables.iter().filter_map(ExtractedVariable::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(variables.iter().all(|v| v.kind == VariableKind::Let));
        assert!(!variables[0].initialized());
    }
}
