//! Expression typing.
//!
//! [`ExprTyper`] computes the [`Type`] of any expression node against the
//! [`SymbolTable`]. Names resolve by priority:
//!
//! ```text
//! local -> parameter -> field -> import -> own class -> superclass
//! ```
//!
//! An identifier that resolves nowhere types as `int`. That keeps unrelated
//! checks running after an unbound name; the analyzer reports the name itself.
//! Calls to methods the class does not declare have no local type and resolve
//! to `None` ("assumed").

use jmm_ast::{Node, NodeKind};
use jmm_core::{InternalError, Type};

use crate::operators::{ArithmeticOp, BooleanOp};
use crate::symbol_table::SymbolTable;

/// Where a name was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Local,
    Param,
    Field,
    Import,
    OwnClass,
    SuperClass,
}

impl Binding {
    /// Whether the name denotes a value (local, parameter or field) rather
    /// than a class.
    pub fn is_variable(self) -> bool {
        matches!(self, Binding::Local | Binding::Param | Binding::Field)
    }
}

/// Types expressions against a symbol table.
#[derive(Debug, Clone, Copy)]
pub struct ExprTyper<'t> {
    table: &'t SymbolTable,
}

impl<'t> ExprTyper<'t> {
    /// Create a typer over `table`.
    pub fn new(table: &'t SymbolTable) -> Self {
        Self { table }
    }

    /// The underlying table.
    pub fn table(&self) -> &'t SymbolTable {
        self.table
    }

    /// Name of the method enclosing `node`.
    pub fn enclosing_method<'a>(node: Node<'a>) -> Option<&'a str> {
        if node.is(NodeKind::MethodDecl) {
            return node.get("name");
        }
        node.ancestor(NodeKind::MethodDecl).and_then(|m| m.get("name"))
    }

    /// Whether `node` sits inside a static method.
    pub fn in_static_context(&self, node: Node<'_>) -> bool {
        Self::enclosing_method(node).is_some_and(|m| self.table.is_static(m))
    }

    /// Resolve `name` as a variable: local, then parameter, then field.
    pub fn lookup_variable(&self, method: Option<&str>, name: &str) -> Option<(Binding, Type)> {
        if let Some(method) = method {
            if let Some(sym) = self.table.local_variables(method).iter().find(|s| s.name == name) {
                return Some((Binding::Local, sym.ty.clone()));
            }
            if let Some(sym) = self.table.parameters(method).iter().find(|s| s.name == name) {
                return Some((Binding::Param, sym.ty.clone()));
            }
        }
        self.table
            .field(name)
            .map(|sym| (Binding::Field, sym.ty.clone()))
    }

    /// Resolve `name` through the full priority chain.
    pub fn resolve_name(&self, method: Option<&str>, name: &str) -> Option<(Binding, Type)> {
        if let Some(found) = self.lookup_variable(method, name) {
            return Some(found);
        }
        if self.table.is_imported(name) {
            return Some((Binding::Import, Type::class(name)));
        }
        if name == self.table.class_name() {
            return Some((Binding::OwnClass, Type::class(name)));
        }
        if self.table.super_class() == Some(name) {
            return Some((Binding::SuperClass, Type::class(name)));
        }
        None
    }

    /// Resolve the identifier `node` through the full priority chain.
    pub fn resolve_identifier(&self, node: Node<'_>) -> Option<(Binding, Type)> {
        let name = node.get("name")?;
        self.resolve_name(Self::enclosing_method(node), name)
    }

    /// Type of an expression node.
    ///
    /// `Ok(None)` means the type is assumed: a call to a method the class
    /// does not declare. Non-expression nodes and unknown operators are
    /// internal faults.
    pub fn resolve(&self, node: Node<'_>) -> Result<Option<Type>, InternalError> {
        let ty = match node.kind() {
            NodeKind::IntegerLiteral => Type::int(),
            NodeKind::BooleanLiteral => Type::boolean(),
            NodeKind::Identifier => self
                .resolve_identifier(node)
                .map(|(_, ty)| ty)
                .unwrap_or_else(Type::int),
            NodeKind::This => Type::class(self.table.class_name()),
            NodeKind::BinaryExpr => {
                ArithmeticOp::of(node)?;
                Type::int()
            }
            NodeKind::BinaryBoolExpr => {
                BooleanOp::of(node)?;
                Type::boolean()
            }
            NodeKind::MethodCall => return self.call_return_type(node),
            NodeKind::ArrayAccess => {
                let Some(array) = node.child(0) else {
                    return Ok(Some(Type::int()));
                };
                return Ok(self
                    .resolve(array)?
                    .map(|ty| ty.element().unwrap_or_else(Type::int)));
            }
            NodeKind::ArrayLiteral => match node.child(0) {
                Some(first) => match self.resolve(first)? {
                    Some(ty) => Type::Array(ty.name().to_string()),
                    None => Type::int_array(),
                },
                None => Type::int_array(),
            },
            NodeKind::NewObject => Type::class(node.get("name").unwrap_or_default()),
            NodeKind::NewArray => Type::int_array(),
            NodeKind::ArrayLength => Type::int(),
            NodeKind::Program
            | NodeKind::ImportDecl
            | NodeKind::ClassDecl
            | NodeKind::VarDecl
            | NodeKind::Type
            | NodeKind::MethodDecl
            | NodeKind::Param
            | NodeKind::AssignStmt
            | NodeKind::ArrayAssignStmt
            | NodeKind::ExprStmt
            | NodeKind::ReturnStmt
            | NodeKind::IfElseStmt
            | NodeKind::WhileStmt
            | NodeKind::BlockStmt => {
                return Err(InternalError::NotAnExpression {
                    kind: node.kind().to_string(),
                    span: node.span(),
                });
            }
        };
        Ok(Some(ty))
    }

    /// Whether a call's receiver is the class itself (`this`, the class name,
    /// or a value of the class type).
    pub fn targets_own_class(&self, call: Node<'_>) -> Result<bool, InternalError> {
        let Some(receiver) = call.child(0) else {
            return Ok(true);
        };
        Ok(self
            .resolve(receiver)?
            .is_some_and(|ty| !ty.is_array() && ty.name() == self.table.class_name()))
    }

    /// Declared return type of a call, or `None` when the callee is assumed.
    pub fn call_return_type(&self, call: Node<'_>) -> Result<Option<Type>, InternalError> {
        let name = call.get("name").unwrap_or_default();
        if !self.table.has_method(name) || !self.targets_own_class(call)? {
            return Ok(None);
        }
        Ok(self.table.return_type(name).cloned())
    }
}
