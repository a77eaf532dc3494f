//! `if` and `while` conditions.

use jmm_ast::{Node, NodeKind};
use jmm_core::{Diagnostics, Type};

use super::{Analyzer, Result};
use crate::symbol_table::declared_symbol;

impl Analyzer<'_> {
    /// The condition must be a `boolean`; reported at the condition node.
    pub(super) fn check_condition(&self, stmt: Node<'_>, diagnostics: &mut Diagnostics) -> Result<()> {
        let Some(condition) = stmt.child(0) else {
            return Ok(());
        };
        if let Some(ty) = self.typer.resolve(condition)? {
            if ty != Type::boolean() {
                self.report(
                    condition,
                    format!("Incompatible types: {ty} and boolean"),
                    diagnostics,
                );
            }
        }
        Ok(())
    }

    /// A `while` may not reference an array-typed variable declared alongside
    /// it. Only declarations sharing the loop's parent are considered.
    pub(super) fn check_loop_with_array(&self, stmt: Node<'_>, diagnostics: &mut Diagnostics) {
        let Some(scope) = stmt.parent() else { return };
        let used: Vec<&str> = stmt
            .descendants()
            .into_iter()
            .filter(|n| n.is(NodeKind::Identifier))
            .filter_map(|n| n.get("name"))
            .collect();
        for decl in scope.children_of(NodeKind::VarDecl) {
            let Ok(symbol) = declared_symbol(decl) else { continue };
            if symbol.ty.is_array() && used.contains(&symbol.name.as_str()) {
                self.report(
                    stmt,
                    format!("Can't do a while statement with array: {}", symbol.name),
                    diagnostics,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::test_support::{analyze, in_method};

    #[test]
    fn conditions_must_be_boolean() {
        let diagnostics = analyze(|b| {
            in_method(b, false, |b| {
                b.at(4, 9);
                let c = b.int_lit(1);
                b.at(4, 5);
                let then = b.block(vec![]);
                let otherwise = b.block(vec![]);
                let s1 = b.if_else(c, then, otherwise);
                let c = b.bool_lit(true);
                let body = b.block(vec![]);
                let s2 = b.while_loop(c, body);
                vec![s1, s2]
            })
        });
        assert_eq!(diagnostics.messages(), vec!["Incompatible types: int and boolean"]);
        let d = diagnostics.iter().next().unwrap();
        assert_eq!((d.line(), d.column()), (4, 9));
    }

    #[test]
    fn loop_rejects_sibling_array() {
        let diagnostics = analyze(|b| {
            in_method(b, false, |b| {
                let t = b.int_array_type();
                let xs = b.var_decl("xs", t);
                let t = b.int_type();
                let i = b.var_decl("i", t);
                let l = b.ident("i");
                let arr = b.ident("xs");
                let r = b.length(arr);
                let cond = b.bool_binary("<", l, r);
                let body = b.block(vec![]);
                let w = b.while_loop(cond, body);
                vec![xs, i, w]
            })
        });
        assert_eq!(diagnostics.messages(), vec!["Can't do a while statement with array: xs"]);
    }

    #[test]
    fn loop_without_array_use_is_fine() {
        let diagnostics = analyze(|b| {
            in_method(b, false, |b| {
                let t = b.int_array_type();
                let xs = b.var_decl("xs", t);
                let t = b.int_type();
                let i = b.var_decl("i", t);
                let l = b.ident("i");
                let r = b.int_lit(10);
                let cond = b.bool_binary("<", l, r);
                let body = b.block(vec![]);
                let w = b.while_loop(cond, body);
                vec![xs, i, w]
            })
        });
        assert!(diagnostics.is_empty(), "{diagnostics}");
    }
}
