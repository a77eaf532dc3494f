//! Shared AST fixtures and builder doubles for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;

use jmm::{Ast, AstBuilder, BuildError, ClassUnit, IrGraphBuilder, NodeId};

/// Build a program from the top-level nodes returned by `build`.
pub fn program(build: impl FnOnce(&mut AstBuilder) -> Vec<NodeId>) -> Ast {
    let mut b = AstBuilder::new();
    let children = build(&mut b);
    b.program(children)
}

/// `imports...; class A [extends S] { void run() { body } }`
pub fn class_with_run(
    imports: &[&str],
    super_name: Option<&str>,
    is_static: bool,
    body: impl FnOnce(&mut AstBuilder) -> Vec<NodeId>,
) -> Ast {
    program(|b| {
        let mut top: Vec<NodeId> = imports.iter().map(|i| b.import(i)).collect();
        let ret = b.return_type_void();
        let stmts = body(b);
        let run = b.method("run", ret, is_static, stmts);
        top.push(b.class("A", super_name, vec![run]));
        top
    })
}

/// `<ty> <name>;` where `ty` names a scalar type or class.
pub fn local(b: &mut AstBuilder, name: &str, ty: &str) -> NodeId {
    let t = b.class_type(ty);
    b.var_decl(name, t)
}

/// `this.<name>(args);`
pub fn call_on_this(b: &mut AstBuilder, name: &str, args: Vec<NodeId>) -> NodeId {
    let this = b.this();
    let call = b.call(name, this, args);
    b.expr_stmt(call)
}

/// An IR-graph builder that returns a fixed graph and records the IR text
/// it was handed.
pub struct FixedGraph {
    unit: ClassUnit,
    received: RefCell<Vec<String>>,
}

impl FixedGraph {
    pub fn new(unit: ClassUnit) -> Self {
        Self {
            unit,
            received: RefCell::new(Vec::new()),
        }
    }

    /// IR texts received so far.
    pub fn received(&self) -> Vec<String> {
        self.received.borrow().clone()
    }
}

impl IrGraphBuilder for FixedGraph {
    fn build(&self, ir: &str) -> Result<ClassUnit, BuildError> {
        self.received.borrow_mut().push(ir.to_string());
        Ok(self.unit.clone())
    }
}
