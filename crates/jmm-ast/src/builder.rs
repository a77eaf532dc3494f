//! Bottom-up construction of an [`Ast`].
//!
//! Children are created first and handed to their parent, which records the
//! back-reference. [`AstBuilder::finish`] seals the arena; the resulting tree
//! is never mutated again.
//!
//! # Example
//!
//! ```
//! use jmm_ast::{AstBuilder, NodeKind};
//!
//! let mut b = AstBuilder::new();
//! let ret = b.return_type_void();
//! let main = b.method("main", ret, true, vec![]);
//! let class = b.class("Hello", None, vec![main]);
//! let ast = b.program(vec![class]);
//!
//! assert_eq!(ast.root().kind(), NodeKind::Program);
//! ```

use jmm_core::Span;
use rustc_hash::FxHashMap;

use crate::node::NodeData;
use crate::{Ast, NodeId, NodeKind};

/// Builds an [`Ast`] one node at a time.
#[derive(Debug, Default)]
pub struct AstBuilder {
    nodes: Vec<NodeData>,
    span: Span,
}

impl AstBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the position recorded on subsequently created nodes.
    pub fn at(&mut self, line: u32, col: u32) -> &mut Self {
        self.span = Span::new(line, col);
        self
    }

    /// Create a node with attributes and children.
    ///
    /// # Panics
    ///
    /// Panics if a child already has a parent.
    pub fn node(&mut self, kind: NodeKind, attributes: &[(&str, &str)], children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in &children {
            let data = &mut self.nodes[child.index()];
            assert!(data.parent.is_none(), "node {:?} attached twice", child);
            data.parent = Some(id);
        }
        let attributes: FxHashMap<String, String> = attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.nodes.push(NodeData {
            kind,
            attributes,
            children,
            parent: None,
            span: self.span,
        });
        id
    }

    /// Seal the arena with `root` as the root node.
    pub fn finish(self, root: NodeId) -> Ast {
        Ast {
            nodes: self.nodes,
            root,
        }
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// `Program` root from imports and a class; finishes the tree.
    pub fn program(mut self, children: Vec<NodeId>) -> Ast {
        let root = self.node(NodeKind::Program, &[], children);
        self.finish(root)
    }

    /// `import <qualified>;`
    pub fn import(&mut self, qualified: &str) -> NodeId {
        self.node(NodeKind::ImportDecl, &[("value", qualified)], vec![])
    }

    /// `class <name> [extends <super_name>] { members }`
    pub fn class(&mut self, name: &str, super_name: Option<&str>, members: Vec<NodeId>) -> NodeId {
        match super_name {
            Some(sup) => self.node(
                NodeKind::ClassDecl,
                &[("name", name), ("superName", sup)],
                members,
            ),
            None => self.node(NodeKind::ClassDecl, &[("name", name)], members),
        }
    }

    /// A type reference.
    pub fn type_ref(&mut self, name: &str, is_array: bool, is_varargs: bool) -> NodeId {
        let array = if is_array { "true" } else { "false" };
        let varargs = if is_varargs { "true" } else { "false" };
        self.node(
            NodeKind::Type,
            &[("value", name), ("isArray", array), ("isVarargs", varargs)],
            vec![],
        )
    }

    /// `int`
    pub fn int_type(&mut self) -> NodeId {
        self.type_ref("int", false, false)
    }

    /// `boolean`
    pub fn bool_type(&mut self) -> NodeId {
        self.type_ref("boolean", false, false)
    }

    /// `int[]`
    pub fn int_array_type(&mut self) -> NodeId {
        self.type_ref("int", true, false)
    }

    /// `int...`
    pub fn varargs_type(&mut self) -> NodeId {
        self.type_ref("int", false, true)
    }

    /// A class type reference.
    pub fn class_type(&mut self, name: &str) -> NodeId {
        self.type_ref(name, false, false)
    }

    /// `void` return type.
    pub fn return_type_void(&mut self) -> NodeId {
        self.type_ref("void", false, false)
    }

    /// `<type> <name>;` as a field or local.
    pub fn var_decl(&mut self, name: &str, ty: NodeId) -> NodeId {
        self.node(NodeKind::VarDecl, &[("name", name)], vec![ty])
    }

    /// `<type> <name>` as a parameter.
    pub fn param(&mut self, name: &str, ty: NodeId) -> NodeId {
        self.node(NodeKind::Param, &[("name", name)], vec![ty])
    }

    /// A public method. `body` holds params, locals and statements in order.
    pub fn method(&mut self, name: &str, return_type: NodeId, is_static: bool, body: Vec<NodeId>) -> NodeId {
        let mut children = vec![return_type];
        children.extend(body);
        let is_static = if is_static { "true" } else { "false" };
        self.node(
            NodeKind::MethodDecl,
            &[("name", name), ("isPublic", "true"), ("isStatic", is_static)],
            children,
        )
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    /// `<name> = <value>;`
    pub fn assign(&mut self, name: &str, value: NodeId) -> NodeId {
        self.node(NodeKind::AssignStmt, &[("name", name)], vec![value])
    }

    /// `<name>[<index>] = <value>;`
    pub fn array_assign(&mut self, name: &str, index: NodeId, value: NodeId) -> NodeId {
        self.node(NodeKind::ArrayAssignStmt, &[("name", name)], vec![index, value])
    }

    /// `<expr>;`
    pub fn expr_stmt(&mut self, expr: NodeId) -> NodeId {
        self.node(NodeKind::ExprStmt, &[], vec![expr])
    }

    /// `return [<expr>];`
    pub fn ret(&mut self, expr: Option<NodeId>) -> NodeId {
        self.node(NodeKind::ReturnStmt, &[], expr.into_iter().collect())
    }

    /// `if (<cond>) <then> else <otherwise>`
    pub fn if_else(&mut self, cond: NodeId, then: NodeId, otherwise: NodeId) -> NodeId {
        self.node(NodeKind::IfElseStmt, &[], vec![cond, then, otherwise])
    }

    /// `while (<cond>) <body>`
    pub fn while_loop(&mut self, cond: NodeId, body: NodeId) -> NodeId {
        self.node(NodeKind::WhileStmt, &[], vec![cond, body])
    }

    /// `{ <stmts> }`
    pub fn block(&mut self, stmts: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::BlockStmt, &[], stmts)
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    /// Integer literal.
    pub fn int_lit(&mut self, value: i32) -> NodeId {
        let value = value.to_string();
        self.node(NodeKind::IntegerLiteral, &[("value", value.as_str())], vec![])
    }

    /// `true` / `false`.
    pub fn bool_lit(&mut self, value: bool) -> NodeId {
        let value = if value { "true" } else { "false" };
        self.node(NodeKind::BooleanLiteral, &[("value", value)], vec![])
    }

    /// Name reference.
    pub fn ident(&mut self, name: &str) -> NodeId {
        self.node(NodeKind::Identifier, &[("name", name)], vec![])
    }

    /// `this`
    pub fn this(&mut self) -> NodeId {
        self.node(NodeKind::This, &[], vec![])
    }

    /// Arithmetic binary expression.
    pub fn binary(&mut self, op: &str, left: NodeId, right: NodeId) -> NodeId {
        self.node(NodeKind::BinaryExpr, &[("op", op)], vec![left, right])
    }

    /// Boolean-producing binary expression.
    pub fn bool_binary(&mut self, op: &str, left: NodeId, right: NodeId) -> NodeId {
        self.node(NodeKind::BinaryBoolExpr, &[("op", op)], vec![left, right])
    }

    /// `<receiver>.<name>(<args>)`
    pub fn call(&mut self, name: &str, receiver: NodeId, args: Vec<NodeId>) -> NodeId {
        let mut children = vec![receiver];
        children.extend(args);
        self.node(NodeKind::MethodCall, &[("name", name)], children)
    }

    /// `<array>[<index>]`
    pub fn array_access(&mut self, array: NodeId, index: NodeId) -> NodeId {
        self.node(NodeKind::ArrayAccess, &[], vec![array, index])
    }

    /// `[<elements>]`
    pub fn array_literal(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::ArrayLiteral, &[], elements)
    }

    /// `new <name>()`
    pub fn new_object(&mut self, name: &str) -> NodeId {
        self.node(NodeKind::NewObject, &[("name", name)], vec![])
    }

    /// `new int[<size>]`
    pub fn new_array(&mut self, size: NodeId) -> NodeId {
        self.node(NodeKind::NewArray, &[], vec![size])
    }

    /// `<array>.length`
    pub fn length(&mut self, array: NodeId) -> NodeId {
        self.node(NodeKind::ArrayLength, &[], vec![array])
    }
}
