//! Per-class symbol table.
//!
//! Built once per compilation unit from the AST and read-only afterward. The
//! table records the class name, optional superclass, imports in declaration
//! order (duplicates kept), fields, the sequential list of declared method
//! names, and per-method return type, parameters and locals.
//!
//! ```text
//! Program
//! ├── ImportDecl*          -> imports
//! └── ClassDecl (last)     -> class name / superclass
//!     ├── VarDecl*         -> fields
//!     └── MethodDecl*      -> methods, return types, params, locals
//! ```

use jmm_ast::{Ast, Node, NodeKind};
use jmm_core::{FatalError, Symbol, Type, find_symbol};
use rustc_hash::FxHashMap;

/// Signature and locals of one declared method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    /// Declared return type.
    pub return_type: Type,
    /// Parameters in declaration order.
    pub params: Vec<Symbol>,
    /// Locals in declaration order.
    pub locals: Vec<Symbol>,
    /// Whether the method is marked static.
    pub is_static: bool,
}

/// Static facts about the single class of a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    class_name: String,
    super_class: Option<String>,
    imports: Vec<String>,
    fields: Vec<Symbol>,
    methods: Vec<String>,
    signatures: FxHashMap<String, MethodSignature>,
}

impl SymbolTable {
    /// Build the table for the class declared by `ast`.
    ///
    /// Fails when the root has no children or its last child is not a class
    /// declaration, and when a declaration lacks its `name` attribute.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(ast: &Ast) -> Result<Self, FatalError> {
        let root = ast.root();
        let class = root.children().last().ok_or(FatalError::EmptyProgram)?;
        if !class.is(NodeKind::ClassDecl) {
            return Err(FatalError::MissingClassDecl {
                found: class.kind().to_string(),
            });
        }

        let imports = root
            .children_of(NodeKind::ImportDecl)
            .map(|import| import.require("value").map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?;

        let fields = class
            .children_of(NodeKind::VarDecl)
            .map(declared_symbol)
            .collect::<Result<Vec<_>, _>>()?;

        let mut methods = Vec::new();
        let mut signatures = FxHashMap::default();
        for method in class.children_of(NodeKind::MethodDecl) {
            let name = method.require("name")?.to_string();
            let signature = MethodSignature {
                return_type: method
                    .first_child_of(NodeKind::Type)
                    .map(type_of_type_node)
                    .transpose()?
                    .unwrap_or_else(Type::void),
                params: method
                    .children_of(NodeKind::Param)
                    .map(declared_symbol)
                    .collect::<Result<Vec<_>, _>>()?,
                locals: method
                    .children_of(NodeKind::VarDecl)
                    .map(declared_symbol)
                    .collect::<Result<Vec<_>, _>>()?,
                is_static: method.flag("isStatic"),
            };
            // A redeclared method is reported by analysis; the first one keeps its entry.
            signatures.entry(name.clone()).or_insert(signature);
            methods.push(name);
        }

        let table = SymbolTable {
            class_name: class.require("name")?.to_string(),
            super_class: class.get("superName").map(str::to_string),
            imports,
            fields,
            methods,
            signatures,
        };
        log::debug!(
            "symbol table built for class {} ({} imports, {} fields, {} methods)",
            table.class_name,
            table.imports.len(),
            table.fields.len(),
            table.methods.len()
        );
        Ok(table)
    }

    // ==========================================================================
    // Class facts
    // ==========================================================================

    /// Name of the declared class.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Superclass name, if the class extends one.
    pub fn super_class(&self) -> Option<&str> {
        self.super_class.as_deref()
    }

    /// Imported qualified names in declaration order.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Field symbols in declaration order.
    pub fn fields(&self) -> &[Symbol] {
        &self.fields
    }

    /// Declared method names in declaration order, duplicates included.
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Whether a method of this name is declared in the class.
    pub fn has_method(&self, name: &str) -> bool {
        self.signatures.contains_key(name)
    }

    /// The declared field named `name`.
    pub fn field(&self, name: &str) -> Option<&Symbol> {
        find_symbol(&self.fields, name)
    }

    // ==========================================================================
    // Per-method facts
    // ==========================================================================

    /// Full signature of a declared method.
    pub fn signature(&self, method: &str) -> Option<&MethodSignature> {
        self.signatures.get(method)
    }

    /// Declared return type of `method`.
    pub fn return_type(&self, method: &str) -> Option<&Type> {
        self.signatures.get(method).map(|s| &s.return_type)
    }

    /// Parameters of `method`; empty when the method is unknown.
    pub fn parameters(&self, method: &str) -> &[Symbol] {
        self.signatures.get(method).map(|s| s.params.as_slice()).unwrap_or(&[])
    }

    /// Locals of `method`; empty when the method is unknown.
    pub fn local_variables(&self, method: &str) -> &[Symbol] {
        self.signatures.get(method).map(|s| s.locals.as_slice()).unwrap_or(&[])
    }

    /// Whether `method` is declared static.
    pub fn is_static(&self, method: &str) -> bool {
        self.signatures.get(method).is_some_and(|s| s.is_static)
    }

    // ==========================================================================
    // Imports
    // ==========================================================================

    /// Whether `name` is an imported name, either fully qualified or by its
    /// last segment.
    pub fn is_imported(&self, name: &str) -> bool {
        self.import_path(name).is_some()
    }

    /// The import that declares `name`.
    pub fn import_path(&self, name: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|import| *import == name || simple_name(import) == name)
            .map(String::as_str)
    }

    /// Whether `name` is the class itself or its superclass.
    pub fn is_own_or_super(&self, name: &str) -> bool {
        name == self.class_name || self.super_class.as_deref() == Some(name)
    }
}

/// Last segment of a qualified name.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// The type of a `Type` node.
pub(crate) fn type_of_type_node(node: Node<'_>) -> Result<Type, FatalError> {
    Ok(Type::from_parts(
        node.require("value")?,
        node.flag("isArray"),
        node.flag("isVarargs"),
    ))
}

/// Symbol for a `VarDecl` or `Param` node.
pub(crate) fn declared_symbol(node: Node<'_>) -> Result<Symbol, FatalError> {
    let ty = match node.first_child_of(NodeKind::Type) {
        Some(ty) => type_of_type_node(ty)?,
        None => {
            return Err(FatalError::MissingAttribute {
                kind: node.kind().to_string(),
                attribute: "type",
                span: node.span(),
            });
        }
    };
    Ok(Symbol::new(node.require("name")?, ty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jmm_ast::AstBuilder;

    fn sample() -> Ast {
        let mut b = AstBuilder::new();
        let io = b.import("io");
        let list = b.import("java.util.List");
        let int = b.int_type();
        let field = b.var_decl("count", int);
        let va = b.varargs_type();
        let bogus = b.var_decl("rest", va);

        let ret = b.int_type();
        let pt = b.int_array_type();
        let p = b.param("xs", pt);
        let lt = b.bool_type();
        let local = b.var_decl("done", lt);
        let sum = b.method("sum", ret, false, vec![p, local]);

        let ret = b.return_type_void();
        let main = b.method("main", ret, true, vec![]);
        let ret = b.int_type();
        let again = b.method("sum", ret, false, vec![]);

        let class = b.class("Calc", Some("Base"), vec![field, bogus, sum, main, again]);
        b.program(vec![io, list, class])
    }

    #[test]
    fn collects_class_facts() {
        let table = SymbolTable::build(&sample()).unwrap();
        assert_eq!(table.class_name(), "Calc");
        assert_eq!(table.super_class(), Some("Base"));
        assert_eq!(table.imports(), ["io", "java.util.List"]);
        assert_eq!(table.fields().len(), 2);
        assert_eq!(table.field("rest").map(|s| &s.ty), Some(&Type::int_varargs()));
    }

    #[test]
    fn keeps_duplicate_method_names_in_order() {
        let table = SymbolTable::build(&sample()).unwrap();
        assert_eq!(table.methods(), ["sum", "main", "sum"]);
        assert_eq!(table.parameters("sum").len(), 1);
        assert_eq!(table.local_variables("sum")[0].ty, Type::boolean());
    }

    #[test]
    fn per_method_facts() {
        let table = SymbolTable::build(&sample()).unwrap();
        assert_eq!(table.return_type("sum"), Some(&Type::int()));
        assert_eq!(table.return_type("main"), Some(&Type::void()));
        assert!(table.is_static("main"));
        assert!(!table.is_static("sum"));
        assert!(table.parameters("missing").is_empty());
    }

    #[test]
    fn imports_match_by_simple_name() {
        let table = SymbolTable::build(&sample()).unwrap();
        assert!(table.is_imported("List"));
        assert!(table.is_imported("java.util.List"));
        assert_eq!(table.import_path("List"), Some("java.util.List"));
        assert!(!table.is_imported("util"));
    }

    #[test]
    fn last_child_must_be_a_class() {
        let mut b = AstBuilder::new();
        let import = b.import("io");
        let ast = b.program(vec![import]);
        assert_eq!(
            SymbolTable::build(&ast),
            Err(FatalError::MissingClassDecl {
                found: "ImportDecl".to_string()
            })
        );
    }

    #[test]
    fn empty_program_is_fatal() {
        let ast = AstBuilder::new().program(vec![]);
        assert_eq!(SymbolTable::build(&ast), Err(FatalError::EmptyProgram));
    }
}
