//! Depth-first traversal with enter/exit hooks and per-kind dispatch.
//!
//! Hooks receive the caller's state, a [`Control`] handle, the node and its
//! parent. Children are visited in the order given by
//! [`NodeKind::child_fields`](ecmalens_core::NodeKind::child_fields).
//!
//! For each node: the kind-agnostic `enter` hook runs, then the kind-specific
//! hook. [`Control::skip`] called from either prevents descent into the
//! node's children but still lets `exit` run. [`Control::abort`] stops the
//! whole traversal immediately; no further hook of any kind runs.

use ecmalens_core::{Node, NodeId, NodeKind};
use std::collections::HashMap;

/// A traversal callback: `(state, control, node, parent)`.
pub type Hook<'a, 'h, S> =
    Box<dyn FnMut(&mut S, &mut Control<'a>, &'a Node, Option<&'a Node>) + 'h>;

/// Flow control handed to every hook.
#[derive(Debug, Default)]
pub struct Control<'a> {
    skipped: bool,
    aborted: bool,
    parents: Option<HashMap<NodeId, &'a Node>>,
}

impl<'a> Control<'a> {
    /// Do not descend into the current node's children.
    pub fn skip(&mut self) {
        self.skipped = true;
    }

    /// Stop the traversal.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Parent of an already visited node. Only available when parent
    /// tracking is enabled with [`Traverser::track_parents`].
    pub fn parent_of(&self, node: &Node) -> Option<&'a Node> {
        self.parents.as_ref()?.get(&node.id).copied()
    }
}

/// The set of hooks for one traversal.
pub struct Visitors<'a, 'h, S> {
    enter: Option<Hook<'a, 'h, S>>,
    exit: Option<Hook<'a, 'h, S>>,
    on: HashMap<NodeKind, Hook<'a, 'h, S>>,
}

impl<S> Default for Visitors<'_, '_, S> {
    fn default() -> Self {
        Self {
            enter: None,
            exit: None,
            on: HashMap::new(),
        }
    }
}

impl<'a, 'h, S> Visitors<'a, 'h, S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called for every node before its children.
    #[must_use]
    pub fn enter(
        mut self,
        hook: impl FnMut(&mut S, &mut Control<'a>, &'a Node, Option<&'a Node>) + 'h,
    ) -> Self {
        self.enter = Some(Box::new(hook));
        self
    }

    /// Called for every node after its children, unless aborted.
    #[must_use]
    pub fn exit(
        mut self,
        hook: impl FnMut(&mut S, &mut Control<'a>, &'a Node, Option<&'a Node>) + 'h,
    ) -> Self {
        self.exit = Some(Box::new(hook));
        self
    }

    /// Called for nodes of `kind`, right after `enter`.
    #[must_use]
    pub fn on(
        mut self,
        kind: NodeKind,
        hook: impl FnMut(&mut S, &mut Control<'a>, &'a Node, Option<&'a Node>) + 'h,
    ) -> Self {
        self.on.insert(kind, Box::new(hook));
        self
    }
}

pub struct Traverser<'a, 'h, S> {
    visitors: Visitors<'a, 'h, S>,
    control: Control<'a>,
}

impl<'a, 'h, S> Traverser<'a, 'h, S> {
    pub fn new(visitors: Visitors<'a, 'h, S>) -> Self {
        Self {
            visitors,
            control: Control::default(),
        }
    }

    /// Record each node's parent so hooks can call [`Control::parent_of`].
    #[must_use]
    pub fn track_parents(mut self) -> Self {
        self.control.parents = Some(HashMap::new());
        self
    }

    pub fn control(&self) -> &Control<'a> {
        &self.control
    }

    /// Walk `root` depth-first. A previous abort is cleared first.
    pub fn traverse(&mut self, root: &'a Node, state: &mut S) {
        self.control.aborted = false;
        self.visit(root, None, state);
        if self.control.aborted {
            tracing::trace!("traversal of {} aborted", root.kind);
        }
    }

    fn visit(&mut self, node: &'a Node, parent: Option<&'a Node>, state: &mut S) {
        if let (Some(parents), Some(parent)) = (self.control.parents.as_mut(), parent) {
            parents.insert(node.id, parent);
        }

        self.control.skipped = false;

        if let Some(enter) = self.visitors.enter.as_mut() {
            enter(state, &mut self.control, node, parent);
        }
        if let Some(hook) = self.visitors.on.get_mut(&node.kind) {
            hook(state, &mut self.control, node, parent);
        }

        if self.control.aborted {
            return;
        }

        if !self.control.skipped {
            for child in node.children() {
                if self.control.aborted {
                    return;
                }
                self.visit(child, Some(node), state);
            }
        }

        if self.control.aborted {
            return;
        }

        if let Some(exit) = self.visitors.exit.as_mut() {
            exit(state, &mut self.control, node, parent);
        }
    }
}

/// Traverse `root` once with `visitors`, without parent tracking.
pub fn traverse<'a, S>(root: &'a Node, visitors: Visitors<'a, '_, S>, state: &mut S) {
    Traverser::new(visitors).traverse(root, state);
}
