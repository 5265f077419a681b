//! Searches built on the traversal engine.

use crate::guards::{
    CallShape, is_call_expression, is_literal, is_new_expression, is_variable_declaration_of_kind,
};
use crate::traverse::{Control, Visitors, traverse};
use ecmalens_core::ast::{Field, LiteralValue, Node, NodeKind, VariableKind};

/// First node, in traversal order, for which `predicate` holds.
///
/// The predicate may call [`Control::skip`] to prune the current subtree.
pub fn find_first<'a>(
    root: &'a Node,
    mut predicate: impl FnMut(&mut Control<'a>, &'a Node) -> bool,
) -> Option<&'a Node> {
    let mut found = None;
    traverse(
        root,
        Visitors::new().enter(|first: &mut Option<&'a Node>, ctl, node, _| {
            if predicate(ctl, node) {
                *first = Some(node);
                ctl.abort();
            }
        }),
        &mut found,
    );
    found
}

/// Every node, in traversal order, for which `predicate` holds.
pub fn find_all<'a>(
    root: &'a Node,
    mut predicate: impl FnMut(&mut Control<'a>, &'a Node) -> bool,
) -> Vec<&'a Node> {
    let mut found = Vec::new();
    traverse(
        root,
        Visitors::new().enter(|matches: &mut Vec<&'a Node>, ctl, node, _| {
            if predicate(ctl, node) {
                matches.push(node);
            }
        }),
        &mut found,
    );
    found
}

pub fn find_literal<'a>(root: &'a Node, value: &LiteralValue) -> Option<&'a Node> {
    find_first(root, |_, node| is_literal(node, Some(value), None))
}

/// First literal written exactly as `raw` in the source.
pub fn find_raw_literal<'a>(root: &'a Node, raw: &str) -> Option<&'a Node> {
    find_first(root, |_, node| is_literal(node, None, Some(raw)))
}

/// First `object.property(...)` call.
pub fn find_member_call<'a>(root: &'a Node, object: &str, property: &str) -> Option<&'a Node> {
    find_first(root, |_, node| {
        is_call_expression(node, CallShape::member(object, property))
    })
}

/// First `new ClassName(...)`.
pub fn find_new_expression<'a>(root: &'a Node, class_name: &str) -> Option<&'a Node> {
    find_first(root, |_, node| is_new_expression(node, Some(class_name)))
}

/// One declarator of a top-level variable declaration.
#[derive(Debug, Clone, Copy)]
pub struct ProgramConstant<'a> {
    pub declaration: &'a Node,
    pub declarator: &'a Node,
    pub kind: VariableKind,
}

impl<'a> ProgramConstant<'a> {
    pub fn id(&self) -> Option<&'a Node> {
        self.declarator.child(Field::Id)
    }

    pub fn init(&self) -> Option<&'a Node> {
        self.declarator.child(Field::Init)
    }

    /// Name of an identifier binding.
    pub fn name(&self) -> Option<&'a str> {
        self.id().and_then(Node::name)
    }
}

/// Declarators of `kinds` declared directly at the top of `root`, including
/// `export const ...`. Nothing nested in other statements is returned.
pub fn find_top_level_constants<'a>(
    root: &'a Node,
    kinds: &[VariableKind],
) -> Vec<ProgramConstant<'a>> {
    let declarations = find_all(root, |ctl, node| {
        if is_variable_declaration_of_kind(node, kinds) {
            ctl.skip();
            return true;
        }
        if !matches!(
            node.kind,
            NodeKind::Program | NodeKind::ExportNamedDeclaration
        ) {
            ctl.skip();
        }
        false
    });

    declarations
        .into_iter()
        .flat_map(|declaration| {
            let kind = declaration
                .props
                .declaration_kind
                .unwrap_or(VariableKind::Var);
            declaration
                .children_of(Field::Declarations)
                .map(move |declarator| ProgramConstant {
                    declaration,
                    declarator,
                    kind,
                })
        })
        .collect()
}
