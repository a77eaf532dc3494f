//! # jmm
//!
//! Semantic analysis and code generation backend for a Java-like teaching
//! language ("Java--"), targeting Jasmin assembly for the JVM.
//!
//! The parser and the IR-graph builder are external collaborators: a parsed
//! [`Ast`] comes in, IR text goes out to an [`IrGraphBuilder`], and the
//! [`ClassUnit`] it returns is emitted as assembly.
//!
//! ```text
//! Ast ─► SymbolTable ─► Analyzer ──► Diagnostics
//!                          │ no errors
//!                          ▼
//!                   OllirGenerator ─► IR text ─► IrGraphBuilder ─► ClassUnit
//!                                                                    │
//!                                           JasminGenerator ◄────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use jmm::{AstBuilder, Compiler};
//!
//! let mut b = AstBuilder::new();
//! let ret = b.return_type_void();
//! let this = b.this();
//! let call = b.call("foo", this, vec![]);
//! let stmt = b.expr_stmt(call);
//! let run = b.method("run", ret, false, vec![stmt]);
//! let class = b.class("A", None, vec![run]);
//! let ast = b.program(vec![class]);
//!
//! let (_, diagnostics) = Compiler::default().analyze(&ast).unwrap();
//! assert_eq!(diagnostics.messages(), vec!["Method not defined: foo"]);
//! ```

mod config;

pub use config::CompilerConfig;

pub use jmm_ast::{Ast, AstBuilder, Node, NodeId, NodeKind};
pub use jmm_compiler::ir::{
    AccessModifier, BinaryOpKind, CallInstruction, CallKind, Descriptor, Element, Field,
    Instruction, Method, MethodFlags,
};
pub use jmm_compiler::{
    Analyzer, ClassUnit, IrGraphBuilder, IrType, JasminGenerator, JasminOptions, OllirGenerator,
    StackLimit, SymbolTable, push_constant,
};
pub use jmm_core::{
    BuildError, Diagnostic, Diagnostics, FatalError, InternalError, JmmError, Result, Severity,
    Span, Stage, Symbol, Type,
};

/// Output of [`Compiler::compile`].
#[derive(Debug, Clone)]
pub struct Compilation {
    pub table: SymbolTable,
    pub diagnostics: Diagnostics,
    /// IR text; `None` when analysis halted the pipeline.
    pub ir: Option<String>,
    /// Assembly text; `None` when analysis halted the pipeline.
    pub assembly: Option<String>,
}

impl Compilation {
    /// Whether analysis reported any error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Runs the backend over one compilation unit at a time.
///
/// Holds only configuration; every call owns its own diagnostics and
/// counters.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Collect the class declarations of `ast`.
    pub fn build_symbol_table(&self, ast: &Ast) -> Result<SymbolTable> {
        Ok(SymbolTable::build(ast)?)
    }

    /// Build the symbol table and run every semantic check.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn analyze(&self, ast: &Ast) -> Result<(SymbolTable, Diagnostics)> {
        let table = self.build_symbol_table(ast)?;
        let diagnostics = Analyzer::new(&table).analyze(ast)?;
        log::debug!(
            "analysis of {} finished with {} error(s)",
            table.class_name(),
            diagnostics.error_count()
        );
        Ok((table, diagnostics))
    }

    /// Lower `ast` to IR text.
    pub fn emit_ir(&self, ast: &Ast, table: &SymbolTable) -> Result<String> {
        Ok(OllirGenerator::new(table).generate(ast)?)
    }

    /// Emit assembly for a built IR graph.
    pub fn emit_assembly(&self, unit: &ClassUnit) -> Result<String> {
        let options = self.config.jasmin_options();
        Ok(JasminGenerator::new(unit, &options).generate()?)
    }

    /// Run the whole pipeline.
    ///
    /// Error diagnostics stop the pipeline after analysis unless the config
    /// allows emitting anyway; the returned [`Compilation`] then carries no
    /// IR or assembly.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(&self, ast: &Ast, builder: &dyn IrGraphBuilder) -> Result<Compilation> {
        let (table, diagnostics) = self.analyze(ast)?;
        if diagnostics.has_errors() && !self.config.emit_on_errors() {
            log::debug!("{} rejected before IR emission", table.class_name());
            return Ok(Compilation {
                table,
                diagnostics,
                ir: None,
                assembly: None,
            });
        }

        let ir = self.emit_ir(ast, &table)?;
        let unit = builder.build(&ir)?;
        let assembly = self.emit_assembly(&unit)?;
        Ok(Compilation {
            table,
            diagnostics,
            ir: Some(ir),
            assembly: Some(assembly),
        })
    }

    /// Run the whole pipeline, failing with [`JmmError::Rejected`] when
    /// analysis reported errors.
    pub fn compile_to_assembly(&self, ast: &Ast, builder: &dyn IrGraphBuilder) -> Result<String> {
        let compilation = self.compile(ast, builder)?;
        match compilation.assembly {
            Some(assembly) if !compilation.diagnostics.has_errors() => Ok(assembly),
            _ => Err(JmmError::Rejected {
                errors: compilation.diagnostics.error_count(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_class() -> Ast {
        let mut b = AstBuilder::new();
        let class = b.class("A", None, vec![]);
        b.program(vec![class])
    }

    fn unused_builder(_: &str) -> std::result::Result<ClassUnit, BuildError> {
        Err(BuildError::new("not reached"))
    }

    #[test]
    fn builder_failures_propagate() {
        let err = Compiler::default()
            .compile(&empty_class(), &unused_builder)
            .unwrap_err();
        assert_eq!(err, JmmError::Build(BuildError::new("not reached")));
    }

    #[test]
    fn fatal_errors_stop_everything() {
        let mut b = AstBuilder::new();
        let import = b.import("io");
        let ast = b.program(vec![import]);
        let err = Compiler::default().analyze(&ast).unwrap_err();
        assert!(err.is_fatal());
    }
}
