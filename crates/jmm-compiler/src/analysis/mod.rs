//! Semantic analysis.
//!
//! The [`Analyzer`] walks the AST in preorder and dispatches each node to the
//! checks registered for its kind. Checks are independent: each appends zero
//! or more diagnostics to the sink it is handed and never stops the walk.
//! Only internal faults (an operator or node kind outside the grammar) abort
//! analysis.
//!
//! | Node kind | Checks |
//! |---|---|
//! | `Program` | duplicate imports |
//! | `ClassDecl` | duplicate fields/methods, varargs fields |
//! | `MethodDecl` | duplicate params/locals, varargs placement and the `varargs` method rule |
//! | `Identifier` | variable resolution, static field reads |
//! | `This` | static context |
//! | `AssignStmt` | target resolution, compatibility, static field writes |
//! | `ArrayAssignStmt` | target resolution, element assignment |
//! | `ReturnStmt` | return type and arity |
//! | `IfElseStmt` / `WhileStmt` | boolean condition, loop-with-array |
//! | `BinaryExpr` / `BinaryBoolExpr` | operand types |
//! | `MethodCall` | callee resolution and argument binding |
//! | `ArrayAccess` / `ArrayLiteral` / `ArrayLength` | array shape and element types |

mod arrays;
mod assignment;
mod calls;
mod conditions;
mod duplicates;
mod expressions;
mod returns;
mod variables;
mod varargs;

use jmm_ast::{Ast, Node, NodeKind};
use jmm_core::{Diagnostics, InternalError, Stage, Type};

use crate::symbol_table::SymbolTable;
use crate::types::ExprTyper;

type Result<T> = std::result::Result<T, InternalError>;

/// Runs every semantic check over one compilation unit.
pub struct Analyzer<'t> {
    table: &'t SymbolTable,
    typer: ExprTyper<'t>,
}

impl<'t> Analyzer<'t> {
    /// Create an analyzer for a built symbol table.
    pub fn new(table: &'t SymbolTable) -> Self {
        Self {
            table,
            typer: ExprTyper::new(table),
        }
    }

    /// Analyze `ast`, returning the diagnostics in walk order.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn analyze(&self, ast: &Ast) -> Result<Diagnostics> {
        let mut diagnostics = Diagnostics::new();
        self.analyze_into(ast, &mut diagnostics)?;
        Ok(diagnostics)
    }

    /// Analyze `ast`, appending to an existing sink.
    pub fn analyze_into(&self, ast: &Ast, diagnostics: &mut Diagnostics) -> Result<()> {
        let before = diagnostics.count();
        for node in ast.root().preorder() {
            self.visit(node, diagnostics)?;
        }
        log::debug!(
            "semantic analysis of {} finished with {} new diagnostic(s)",
            self.table.class_name(),
            diagnostics.count() - before
        );
        Ok(())
    }

    fn visit(&self, node: Node<'_>, diagnostics: &mut Diagnostics) -> Result<()> {
        match node.kind() {
            NodeKind::Program => self.check_duplicate_imports(node, diagnostics),
            NodeKind::ClassDecl => {
                self.check_duplicate_fields(node, diagnostics);
                self.check_duplicate_methods(node, diagnostics);
                self.check_varargs_fields(node, diagnostics);
            }
            NodeKind::MethodDecl => {
                log::trace!("analyzing method {}", node.get("name").unwrap_or_default());
                self.check_duplicate_params(node, diagnostics);
                self.check_duplicate_locals(node, diagnostics);
                self.check_varargs_placement(node, diagnostics);
                self.check_varargs_method(node, diagnostics);
            }
            NodeKind::ImportDecl | NodeKind::VarDecl | NodeKind::Type | NodeKind::Param => {}
            NodeKind::AssignStmt => {
                self.check_assign_target(node, diagnostics);
                self.check_static_field_write(node, diagnostics);
                self.check_assignment(node, diagnostics)?;
            }
            NodeKind::ArrayAssignStmt => {
                self.check_assign_target(node, diagnostics);
                self.check_static_field_write(node, diagnostics);
                self.check_array_assignment(node, diagnostics)?;
            }
            NodeKind::ExprStmt | NodeKind::BlockStmt => {}
            NodeKind::ReturnStmt => self.check_return(node, diagnostics)?,
            NodeKind::IfElseStmt => self.check_condition(node, diagnostics)?,
            NodeKind::WhileStmt => {
                self.check_condition(node, diagnostics)?;
                self.check_loop_with_array(node, diagnostics);
            }
            NodeKind::IntegerLiteral | NodeKind::BooleanLiteral => {}
            NodeKind::Identifier => {
                self.check_variable_defined(node, diagnostics);
                self.check_static_field_read(node, diagnostics);
            }
            NodeKind::This => self.check_static_this(node, diagnostics),
            NodeKind::BinaryExpr => self.check_arithmetic(node, diagnostics)?,
            NodeKind::BinaryBoolExpr => self.check_boolean(node, diagnostics)?,
            NodeKind::MethodCall => self.check_call(node, diagnostics)?,
            NodeKind::ArrayAccess => self.check_array_access(node, diagnostics)?,
            NodeKind::ArrayLiteral => self.check_array_literal(node, diagnostics)?,
            NodeKind::ArrayLength => self.check_array_length(node, diagnostics)?,
            NodeKind::NewObject | NodeKind::NewArray => {}
        }
        Ok(())
    }

    // ==========================================================================
    // Shared helpers
    // ==========================================================================

    /// Record a semantic error at `node`.
    fn report(&self, node: Node<'_>, message: String, diagnostics: &mut Diagnostics) {
        diagnostics.error(Stage::Semantic, node.span(), message);
    }

    /// Whether a value of `source` may flow into `destination`.
    ///
    /// Shapes must match, except that types the unit cannot see into are
    /// assumed correct: two imported names, or the class and its superclass
    /// in either direction.
    fn compatible(&self, source: &Type, destination: &Type) -> bool {
        if source.matches_shape(destination) {
            return true;
        }
        if source.is_array() != destination.is_array() {
            return false;
        }
        let (s, d) = (source.name(), destination.name());
        let both_imported = self.table.is_imported(s) && self.table.is_imported(d);
        let class_pair = s != d && self.table.is_own_or_super(s) && self.table.is_own_or_super(d);
        both_imported || class_pair
    }

    /// Name of the method enclosing `node`.
    fn method_of<'a>(&self, node: Node<'a>) -> Option<&'a str> {
        ExprTyper::enclosing_method(node)
    }

    /// Resolve the `name` attribute of an assignment as a variable.
    fn assign_target(&self, stmt: Node<'_>) -> Option<(crate::types::Binding, Type)> {
        let name = stmt.get("name")?;
        self.typer.lookup_variable(self.method_of(stmt), name)
    }
}

/// Short textual rendering of an expression for messages.
fn describe(node: Node<'_>) -> String {
    match node.kind() {
        NodeKind::Identifier | NodeKind::NewObject => node.get("name").unwrap_or_default().to_string(),
        NodeKind::IntegerLiteral | NodeKind::BooleanLiteral => node.get("value").unwrap_or_default().to_string(),
        NodeKind::This => "this".to_string(),
        kind => kind.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixture for analyzer unit tests.

    use jmm_ast::{Ast, AstBuilder, NodeId};
    use jmm_core::Diagnostics;

    use super::Analyzer;
    use crate::symbol_table::SymbolTable;

    /// Analyze a program assembled by `build`.
    pub fn analyze(build: impl FnOnce(&mut AstBuilder) -> Vec<NodeId>) -> Diagnostics {
        let mut b = AstBuilder::new();
        let children = build(&mut b);
        let ast: Ast = b.program(children);
        let table = SymbolTable::build(&ast).unwrap();
        Analyzer::new(&table).analyze(&ast).unwrap()
    }

    /// `class A { void run() { body } }`
    pub fn in_method(
        b: &mut AstBuilder,
        is_static: bool,
        body: impl FnOnce(&mut AstBuilder) -> Vec<NodeId>,
    ) -> Vec<NodeId> {
        let ret = b.return_type_void();
        let body = body(b);
        let method = b.method("run", ret, is_static, body);
        vec![b.class("A", None, vec![method])]
    }
}
