//! Assignment compatibility.
//!
//! `int` and `boolean` never cross, whatever the exceptions below say. Beyond
//! that the right-hand side must match the declared type in name and shape,
//! except for types the unit cannot inspect (two imported names, or the
//! class/superclass pair in either direction), which are assumed correct.

use jmm_ast::{Node, NodeKind};
use jmm_core::Diagnostics;

use super::{Analyzer, Result};

impl Analyzer<'_> {
    /// `x = value;`
    pub(super) fn check_assignment(&self, stmt: Node<'_>, diagnostics: &mut Diagnostics) -> Result<()> {
        let Some((_, target)) = self.assign_target(stmt) else {
            return Ok(());
        };
        let Some(value) = stmt.child(0) else {
            return Ok(());
        };
        // Array literals are checked element-wise by the array checks.
        if value.is(NodeKind::ArrayLiteral) {
            return Ok(());
        }
        if value.is(NodeKind::Identifier) && self.typer.resolve_identifier(value).is_none() {
            return Ok(());
        }
        let Some(source) = self.typer.resolve(value)? else {
            return Ok(());
        };

        let name = stmt.get("name").unwrap_or_default();
        if target.is_int() && source.is_boolean() {
            self.report(stmt, format!("Can't assign bool to int: {name}"), diagnostics);
        } else if target.is_boolean() && source.is_int() {
            self.report(stmt, format!("Can't assign int to bool: {name}"), diagnostics);
        } else if !self.compatible(&source, &target) {
            self.report(
                stmt,
                format!("Incompatible types: {source} and {target}"),
                diagnostics,
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::test_support::analyze;
    use jmm_ast::{AstBuilder, NodeId};

    /// `class A [extends super] { void run() { <lhs_ty> x; <rhs_ty> y; x = y; } }`
    fn assign(imports: &[&str], super_name: Option<&str>, lhs: &str, rhs: &str) -> Vec<String> {
        let decl = |b: &mut AstBuilder, name: &str, ty: &str| -> NodeId {
            let t = b.class_type(ty);
            b.var_decl(name, t)
        };
        analyze(|b| {
            let mut top: Vec<NodeId> = imports.iter().map(|i| b.import(i)).collect();
            let x = decl(b, "x", lhs);
            let y = decl(b, "y", rhs);
            let v = b.ident("y");
            let s = b.assign("x", v);
            let ret = b.return_type_void();
            let m = b.method("run", ret, false, vec![x, y, s]);
            top.push(b.class("A", super_name, vec![m]));
            top
        })
        .messages()
        .into_iter()
        .map(str::to_string)
        .collect()
    }

    #[test]
    fn bool_and_int_never_cross() {
        assert_eq!(assign(&[], None, "int", "boolean"), vec!["Can't assign bool to int: x"]);
        assert_eq!(assign(&[], None, "boolean", "int"), vec!["Can't assign int to bool: x"]);
        assert_eq!(
            assign(&["int", "boolean"], None, "int", "boolean"),
            vec!["Can't assign bool to int: x"]
        );
    }

    #[test]
    fn imported_pairs_are_assumed() {
        assert!(assign(&["Foo", "Bar"], None, "Foo", "Bar").is_empty());
        assert!(assign(&["Foo", "Bar"], None, "Bar", "Foo").is_empty());
        assert_eq!(
            assign(&["Foo"], None, "Foo", "Baz"),
            vec!["Incompatible types: Baz and Foo"]
        );
    }

    #[test]
    fn class_and_superclass_are_assumed_both_ways() {
        assert!(assign(&[], Some("B"), "A", "B").is_empty());
        assert!(assign(&[], Some("B"), "B", "A").is_empty());
        assert_eq!(assign(&[], None, "A", "B"), vec!["Incompatible types: B and A"]);
    }

    #[test]
    fn arrays_do_not_take_scalars() {
        let messages: Vec<String> = analyze(|b| {
            let t = b.int_array_type();
            let xs = b.var_decl("xs", t);
            let one = b.int_lit(1);
            let s = b.assign("xs", one);
            let ret = b.return_type_void();
            let m = b.method("run", ret, false, vec![xs, s]);
            vec![b.class("A", None, vec![m])]
        })
        .messages()
        .into_iter()
        .map(str::to_string)
        .collect();
        assert_eq!(messages, vec!["Incompatible types: int and int[]"]);
    }
}
