//! Duplicate declarations.
//!
//! Every declaration scope (imports, fields, methods, and per-method
//! parameters and locals) requires unique names. The second and later
//! occurrences are reported, each at its own node.

use jmm_ast::{Node, NodeKind};
use jmm_core::Diagnostics;
use rustc_hash::FxHashSet;

use super::Analyzer;

impl Analyzer<'_> {
    /// `import a.b; import a.b;`
    pub(super) fn check_duplicate_imports(&self, program: Node<'_>, diagnostics: &mut Diagnostics) {
        self.check_unique(
            program.children_of(NodeKind::ImportDecl),
            "value",
            "import",
            diagnostics,
        );
    }

    /// Two fields with the same name.
    pub(super) fn check_duplicate_fields(&self, class: Node<'_>, diagnostics: &mut Diagnostics) {
        self.check_unique(class.children_of(NodeKind::VarDecl), "name", "field", diagnostics);
    }

    /// Two methods with the same name.
    pub(super) fn check_duplicate_methods(&self, class: Node<'_>, diagnostics: &mut Diagnostics) {
        self.check_unique(
            class.children_of(NodeKind::MethodDecl),
            "name",
            "method",
            diagnostics,
        );
    }

    /// Two parameters of one method with the same name.
    pub(super) fn check_duplicate_params(&self, method: Node<'_>, diagnostics: &mut Diagnostics) {
        self.check_unique(
            method.children_of(NodeKind::Param),
            "name",
            "parameter",
            diagnostics,
        );
    }

    /// Two locals of one method with the same name.
    pub(super) fn check_duplicate_locals(&self, method: Node<'_>, diagnostics: &mut Diagnostics) {
        self.check_unique(method.children_of(NodeKind::VarDecl), "name", "local", diagnostics);
    }

    fn check_unique<'a>(
        &self,
        declarations: impl Iterator<Item = Node<'a>>,
        key: &str,
        what: &str,
        diagnostics: &mut Diagnostics,
    ) {
        let mut seen = FxHashSet::default();
        for decl in declarations {
            let Some(name) = decl.get(key) else { continue };
            if !seen.insert(name) {
                self.report(decl, format!("Duplicated {what}: {name}"), diagnostics);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::test_support::analyze;

    #[test]
    fn every_scope_is_checked() {
        let diagnostics = analyze(|b| {
            let i1 = b.import("io");
            let i2 = b.import("io");
            let t = b.int_type();
            let f1 = b.var_decl("x", t);
            let t = b.bool_type();
            let f2 = b.var_decl("x", t);

            let ret = b.return_type_void();
            let t = b.int_type();
            let p1 = b.param("a", t);
            let t = b.int_type();
            let p2 = b.param("a", t);
            let t = b.int_type();
            let l1 = b.var_decl("v", t);
            let t = b.int_type();
            let l2 = b.var_decl("v", t);
            let m1 = b.method("m", ret, false, vec![p1, p2, l1, l2]);
            let ret = b.return_type_void();
            let m2 = b.method("m", ret, false, vec![]);

            let class = b.class("A", None, vec![f1, f2, m1, m2]);
            vec![i1, i2, class]
        });
        assert_eq!(
            diagnostics.messages(),
            vec![
                "Duplicated import: io",
                "Duplicated field: x",
                "Duplicated method: m",
                "Duplicated parameter: a",
                "Duplicated local: v",
            ]
        );
    }

    #[test]
    fn same_name_in_different_methods_is_fine() {
        let diagnostics = analyze(|b| {
            let ret = b.return_type_void();
            let t = b.int_type();
            let l1 = b.var_decl("v", t);
            let m1 = b.method("m", ret, false, vec![l1]);
            let ret = b.return_type_void();
            let t = b.int_type();
            let l2 = b.var_decl("v", t);
            let m2 = b.method("n", ret, false, vec![l2]);
            vec![b.class("A", None, vec![m1, m2])]
        });
        assert!(diagnostics.is_empty());
    }
}
