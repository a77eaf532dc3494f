//! The node arena.
//!
//! Nodes live in one `Vec` owned by the [`Ast`]. Children and the parent
//! back-reference are [`NodeId`] indices into that arena, so the tree has no
//! owning cycles. A [`Node`] is a cheap `Copy` handle pairing the arena with
//! an id.

use std::fmt::Write as _;

use jmm_core::{FatalError, Span};
use rustc_hash::FxHashMap;

use crate::NodeKind;

/// Index of a node in its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Position in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stored data for one node.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) attributes: FxHashMap<String, String>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) span: Span,
}

/// An immutable syntax tree for one compilation unit.
#[derive(Debug, Clone)]
pub struct Ast {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) root: NodeId,
}

impl Ast {
    /// The root node.
    pub fn root(&self) -> Node<'_> {
        self.node(self.root)
    }

    /// Handle for a node id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this tree.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        assert!(id.index() < self.nodes.len(), "node {:?} out of range", id);
        Node { ast: self, id }
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty (never true for a built tree).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Render the tree with one node per line, indented by depth.
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let _ = write!(out, "{:indent$}{}", "", node.kind(), indent = depth * 2);
            let mut attributes: Vec<_> = node.data().attributes.iter().collect();
            attributes.sort();
            if !attributes.is_empty() {
                out.push_str(" (");
                for (i, (key, value)) in attributes.into_iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{key}: {value}");
                }
                out.push(')');
            }
            out.push('\n');
            for child in node.children().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

/// A handle to one node of an [`Ast`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    ast: &'a Ast,
    id: NodeId,
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ast, other.ast) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}@{}", self.kind(), self.id.0, self.span())
    }
}

impl<'a> Node<'a> {
    #[inline]
    fn data(&self) -> &'a NodeData {
        &self.ast.nodes[self.id.index()]
    }

    /// The tree this node belongs to.
    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    /// Arena id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Kind tag.
    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    /// Whether this node has the given kind.
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind() == kind
    }

    /// Source position.
    pub fn span(&self) -> Span {
        self.data().span
    }

    /// Source line (1-based).
    pub fn line(&self) -> u32 {
        self.data().span.line
    }

    /// Source column (1-based).
    pub fn column(&self) -> u32 {
        self.data().span.col
    }

    // ==========================================================================
    // Attributes
    // ==========================================================================

    /// Attribute value, if present.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.data().attributes.get(key).map(String::as_str)
    }

    /// Whether the attribute is present.
    pub fn has(&self, key: &str) -> bool {
        self.data().attributes.contains_key(key)
    }

    /// Attribute interpreted as a flag: `true` only for the string `"true"`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    /// Attribute value, or a fatal error naming the node and key.
    pub fn require(&self, key: &'static str) -> Result<&'a str, FatalError> {
        self.get(key).ok_or_else(|| FatalError::MissingAttribute {
            kind: self.kind().to_string(),
            attribute: key,
            span: self.span(),
        })
    }

    // ==========================================================================
    // Navigation
    // ==========================================================================

    /// Children in order.
    pub fn children(self) -> impl DoubleEndedIterator<Item = Node<'a>> + ExactSizeIterator + 'a {
        let ast = self.ast;
        self.data().children.iter().map(move |&id| Node { ast, id })
    }

    /// Number of children.
    pub fn num_children(&self) -> usize {
        self.data().children.len()
    }

    /// Child at `index`.
    pub fn child(&self, index: usize) -> Option<Node<'a>> {
        self.data().children.get(index).map(|&id| Node { ast: self.ast, id })
    }

    /// Children of a given kind, in order.
    pub fn children_of(self, kind: NodeKind) -> impl Iterator<Item = Node<'a>> + 'a {
        self.children().filter(move |c| c.kind() == kind)
    }

    /// First child of a given kind.
    pub fn first_child_of(&self, kind: NodeKind) -> Option<Node<'a>> {
        self.children().find(|c| c.kind() == kind)
    }

    /// Parent node; `None` for the root.
    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| Node { ast: self.ast, id })
    }

    /// Nearest strict ancestor of the given kind.
    pub fn ancestor(&self, kind: NodeKind) -> Option<Node<'a>> {
        let mut current = self.parent();
        while let Some(node) = current {
            if node.kind() == kind {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    /// All strict descendants in preorder.
    pub fn descendants(&self) -> Vec<Node<'a>> {
        let mut out = Vec::new();
        let mut stack: Vec<Node<'a>> = self.children().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children().rev());
        }
        out
    }

    /// This node followed by all descendants, in preorder.
    pub fn preorder(&self) -> Vec<Node<'a>> {
        let mut out = vec![*self];
        out.extend(self.descendants());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AstBuilder;

    fn sample() -> Ast {
        let mut b = AstBuilder::new();
        let one = b.int_lit(1);
        let x = b.ident("x");
        let sum = b.binary("+", x, one);
        let stmt = b.assign("x", sum);
        let int = b.int_type();
        let ret = b.return_type_void();
        let local = b.var_decl("x", int);
        let method = b.method("run", ret, false, vec![local, stmt]);
        let class = b.class("A", None, vec![method]);
        b.program(vec![class])
    }

    #[test]
    fn parent_links_follow_children() {
        let ast = sample();
        let root = ast.root();
        assert!(root.parent().is_none());
        for node in root.descendants() {
            let parent = node.parent().expect("non-root has a parent");
            assert!(parent.children().any(|c| c == node));
        }
    }

    #[test]
    fn ancestor_finds_enclosing_method() {
        let ast = sample();
        let ident = ast
            .root()
            .descendants()
            .into_iter()
            .find(|n| n.is(NodeKind::Identifier))
            .unwrap();
        let method = ident.ancestor(NodeKind::MethodDecl).unwrap();
        assert_eq!(method.get("name"), Some("run"));
        assert!(ident.ancestor(NodeKind::WhileStmt).is_none());
    }

    #[test]
    fn attributes_and_flags() {
        let ast = sample();
        let method = ast.root().descendants().into_iter().find(|n| n.is(NodeKind::MethodDecl)).unwrap();
        assert!(!method.flag("isStatic"));
        assert!(method.flag("isPublic"));
        assert!(method.require("name").is_ok());
        assert!(matches!(
            method.require("superName"),
            Err(FatalError::MissingAttribute { attribute: "superName", .. })
        ));
    }

    #[test]
    fn preorder_visits_parents_first() {
        let ast = sample();
        let kinds: Vec<_> = ast.root().preorder().iter().map(|n| n.kind()).collect();
        assert_eq!(kinds[0], NodeKind::Program);
        assert_eq!(kinds[1], NodeKind::ClassDecl);
        assert_eq!(kinds[2], NodeKind::MethodDecl);
        let binary = kinds.iter().position(|k| *k == NodeKind::BinaryExpr).unwrap();
        let ident = kinds.iter().position(|k| *k == NodeKind::Identifier).unwrap();
        assert!(binary < ident);
    }

    #[test]
    fn tree_string_is_indented() {
        let ast = sample();
        let tree = ast.to_tree_string();
        assert!(tree.starts_with("Program\n  ClassDecl (name: A)\n"));
        assert!(tree.contains("      BinaryExpr (op: +)"));
    }
}
