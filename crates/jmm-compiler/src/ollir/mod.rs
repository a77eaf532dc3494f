//! IR emission.
//!
//! Lowers the analyzed AST into the textual three-address IR consumed by the
//! external IR-graph builder. Two cooperating halves:
//!
//! - expressions ([`ExprResult`]): a `code` operand reference with its type
//!   suffix, plus the `computation` text that must run before it
//! - statements: instruction text, built from expression results
//!
//! ```text
//! import io;
//! Calc extends Base {
//! .field public total.i32;
//!
//! .construct Calc().V {
//! invokespecial(this, "<init>").V;
//! }
//!
//! .method public add(a.i32, b.i32).i32 {
//! t0.i32 :=.i32 a.i32 +.i32 b.i32;
//! ret.i32 t0.i32;
//! }
//! }
//! ```
//!
//! Every non-trivial expression gets one fresh temporary; literals and
//! variables are referenced directly. Temporaries and labels are numbered by
//! counters scoped to one compilation unit.

mod expr;
mod stmt;

use std::fmt::Write as _;

use jmm_ast::{Ast, Node, NodeKind};
use jmm_core::{InternalError, Type, names};

use crate::symbol_table::{SymbolTable, declared_symbol};
use crate::types::ExprTyper;

type Result<T> = std::result::Result<T, InternalError>;

/// Terminator of every IR statement.
const END_STMT: &str = ";\n";

/// An operand reference and the instructions that compute it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExprResult {
    /// Operand reference with its type suffix, e.g. `t3.i32` or `a.array.i32`.
    pub code: String,
    /// Instructions to run before `code` is valid; empty for literals and
    /// plain variables.
    pub computation: String,
}

impl ExprResult {
    /// A directly nameable operand.
    pub fn operand(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            computation: String::new(),
        }
    }

    /// An operand computed by `computation`.
    pub fn computed(code: impl Into<String>, computation: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            computation: computation.into(),
        }
    }
}

/// IR type suffix for a type: `.i32`, `.bool`, `.V`, `.array.i32`, `.Name`.
pub fn ollir_type(ty: &Type) -> String {
    match ty {
        Type::Scalar(name) => scalar_suffix(name),
        Type::Array(name) | Type::Varargs(name) => format!(".array{}", scalar_suffix(name)),
    }
}

fn scalar_suffix(name: &str) -> String {
    match name {
        names::INT => ".i32".to_string(),
        names::BOOLEAN => ".bool".to_string(),
        names::VOID => ".V".to_string(),
        other => format!(".{other}"),
    }
}

/// Per-method lowering context.
#[derive(Debug, Clone)]
pub(crate) struct MethodContext {
    pub(crate) name: String,
    pub(crate) return_type: Type,
}

/// Emits IR text for one compilation unit.
pub struct OllirGenerator<'t> {
    table: &'t SymbolTable,
    typer: ExprTyper<'t>,
    temps: u32,
    labels: u32,
}

impl<'t> OllirGenerator<'t> {
    /// Create a generator over a built symbol table.
    pub fn new(table: &'t SymbolTable) -> Self {
        Self {
            table,
            typer: ExprTyper::new(table),
            temps: 0,
            labels: 0,
        }
    }

    /// Lower the whole unit to IR text.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate(&mut self, ast: &Ast) -> Result<String> {
        self.temps = 0;
        self.labels = 0;

        let mut code = String::new();
        for import in self.table.imports() {
            let _ = write!(code, "import {import}{END_STMT}");
        }

        for class in ast.root().children_of(NodeKind::ClassDecl) {
            code.push_str(&self.lower_class(class)?);
        }

        log::debug!(
            "IR emitted for class {} ({} temporaries, {} label groups)",
            self.table.class_name(),
            self.temps,
            self.labels
        );
        Ok(code)
    }

    fn lower_class(&mut self, class: Node<'_>) -> Result<String> {
        let mut code = String::new();
        code.push_str(self.table.class_name());
        if let Some(sup) = self.table.super_class() {
            let _ = write!(code, " extends {sup}");
        }
        code.push_str(" {\n");

        for field in self.table.fields() {
            let _ = write!(
                code,
                ".field public {}{}{END_STMT}",
                field.name,
                ollir_type(&field.ty)
            );
        }

        code.push_str(&self.constructor());

        for method in class.children_of(NodeKind::MethodDecl) {
            code.push_str(&self.lower_method(method)?);
        }

        code.push_str("}\n");
        Ok(code)
    }

    /// The implicit zero-argument constructor.
    fn constructor(&self) -> String {
        format!(
            "\n.construct {}().V {{\ninvokespecial(this, \"<init>\").V{END_STMT}}}\n",
            self.table.class_name()
        )
    }

    fn lower_method(&mut self, method: Node<'_>) -> Result<String> {
        let name = method.get("name").unwrap_or_default();
        let return_type = self.table.return_type(name).cloned().unwrap_or_else(Type::void);
        log::trace!("lowering method {name}");

        let mut code = String::from("\n.method ");
        if method.flag("isPublic") {
            code.push_str("public ");
        }
        if method.flag("isStatic") {
            code.push_str("static ");
        }

        let params = method
            .children_of(NodeKind::Param)
            .filter_map(|p| declared_symbol(p).ok())
            .map(|p| format!("{}{}", p.name, ollir_type(&p.ty)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(code, "{name}({params}){} {{\n", ollir_type(&return_type));

        let ctx = MethodContext {
            name: name.to_string(),
            return_type: return_type.clone(),
        };
        let statements: Vec<_> = method.children().filter(|c| c.kind().is_statement()).collect();
        for stmt in &statements {
            code.push_str(&self.lower_stmt(*stmt, &ctx)?);
        }

        let ends_with_return = statements.last().is_some_and(|s| s.is(NodeKind::ReturnStmt));
        if return_type.is_void() && !ends_with_return {
            let _ = write!(code, "ret.V{END_STMT}");
        }

        code.push_str("}\n");
        Ok(code)
    }

    // ==========================================================================
    // Counters
    // ==========================================================================

    /// A fresh temporary with the given type suffix, e.g. `t4.i32`.
    fn next_temp(&mut self, suffix: &str) -> String {
        let temp = format!("t{}{}", self.temps, suffix);
        self.temps += 1;
        temp
    }

    /// A fresh label number, shared by the labels of one construct.
    fn next_label(&mut self) -> u32 {
        let label = self.labels;
        self.labels += 1;
        label
    }
}

/// The bare name of an operand reference: `t3.array.i32` -> `t3`.
fn operand_name(code: &str) -> &str {
    code.split('.').next().unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jmm_ast::AstBuilder;

    pub(super) fn lower(build: impl FnOnce(&mut AstBuilder) -> Vec<jmm_ast::NodeId>) -> String {
        let mut b = AstBuilder::new();
        let children = build(&mut b);
        let ast = b.program(children);
        let table = SymbolTable::build(&ast).unwrap();
        OllirGenerator::new(&table).generate(&ast).unwrap()
    }

    #[test]
    fn type_suffixes() {
        assert_eq!(ollir_type(&Type::int()), ".i32");
        assert_eq!(ollir_type(&Type::boolean()), ".bool");
        assert_eq!(ollir_type(&Type::void()), ".V");
        assert_eq!(ollir_type(&Type::int_array()), ".array.i32");
        assert_eq!(ollir_type(&Type::int_varargs()), ".array.i32");
        assert_eq!(ollir_type(&Type::Array("String".into())), ".array.String");
        assert_eq!(ollir_type(&Type::class("Foo")), ".Foo");
    }

    #[test]
    fn operand_names() {
        assert_eq!(operand_name("t3.array.i32"), "t3");
        assert_eq!(operand_name("a.i32"), "a");
    }

    #[test]
    fn class_skeleton() {
        let code = lower(|b| {
            let import = b.import("java.io.Console");
            let t = b.int_type();
            let field = b.var_decl("total", t);
            let ret = b.return_type_void();
            let t = b.int_array_type();
            let args = b.param("args", t);
            let main = b.method("main", ret, true, vec![args]);
            vec![import, b.class("Calc", Some("Base"), vec![field, main])]
        });
        assert_eq!(
            code,
            "import java.io.Console;\n\
             Calc extends Base {\n\
             .field public total.i32;\n\
             \n\
             .construct Calc().V {\n\
             invokespecial(this, \"<init>\").V;\n\
             }\n\
             \n\
             .method public static main(args.array.i32).V {\n\
             ret.V;\n\
             }\n\
             }\n"
        );
    }

    #[test]
    fn void_method_gets_exactly_one_return() {
        let code = lower(|b| {
            let ret = b.return_type_void();
            let r = b.ret(None);
            let m = b.method("done", ret, false, vec![r]);
            let ret = b.return_type_void();
            let n = b.method("open", ret, false, vec![]);
            vec![b.class("A", None, vec![m, n])]
        });
        assert_eq!(code.matches("ret.V;").count(), 2);
    }
}
