//! Array literals, indexing, element assignment and `length`.

use jmm_ast::{Node, NodeKind};
use jmm_core::{Diagnostics, Type};

use super::{Analyzer, Result, describe};

impl Analyzer<'_> {
    /// `x = [a, b, ...]`: the target must be an array and all typed elements
    /// must share the first typed element's type.
    pub(super) fn check_array_literal(&self, literal: Node<'_>, diagnostics: &mut Diagnostics) -> Result<()> {
        let mut element_types = Vec::with_capacity(literal.num_children());
        for element in literal.children() {
            element_types.push(self.typer.resolve(element)?);
        }

        // Assumed call results have no type; the first typed element sets the kind.
        let mut known = element_types.iter().flatten();
        let first = known.next();
        if let Some(first) = first {
            for ty in known {
                if ty != first {
                    self.report(
                        literal,
                        format!("Different types: {first} and {ty}"),
                        diagnostics,
                    );
                }
            }
        }

        let Some(stmt) = literal.parent().filter(|p| p.is(NodeKind::AssignStmt)) else {
            return Ok(());
        };
        let Some((_, target)) = self.assign_target(stmt) else {
            return Ok(());
        };
        let name = stmt.get("name").unwrap_or_default();
        if !target.is_array() {
            self.report(
                literal,
                format!("Can't initiate an array when it does not exist: {name}"),
                diagnostics,
            );
        } else if let Some(first) = first {
            if first.name() != target.name() {
                self.report(
                    literal,
                    format!("Incompatible types: {}[] and {target}", first.name()),
                    diagnostics,
                );
            }
        }
        Ok(())
    }

    /// `a[i]`: `a` must be an array and `i` an `int`.
    pub(super) fn check_array_access(&self, access: Node<'_>, diagnostics: &mut Diagnostics) -> Result<()> {
        let (Some(array), Some(index)) = (access.child(0), access.child(1)) else {
            return Ok(());
        };
        if let Some(ty) = self.typer.resolve(array)? {
            if !ty.is_array() {
                self.report(
                    access,
                    format!("Can't do an array expression with non array: {}", describe(array)),
                    diagnostics,
                );
            }
        }
        self.check_index(access, index, diagnostics)
    }

    /// `a[i] = v`: `a` must be an array, `i` an `int`, `v` the element type.
    pub(super) fn check_array_assignment(&self, stmt: Node<'_>, diagnostics: &mut Diagnostics) -> Result<()> {
        let Some((_, target)) = self.assign_target(stmt) else {
            return Ok(());
        };
        let name = stmt.get("name").unwrap_or_default();
        let Some(element) = target.element() else {
            self.report(
                stmt,
                format!("Can't do an array expression with non array: {name}"),
                diagnostics,
            );
            return Ok(());
        };
        if let Some(index) = stmt.child(0) {
            self.check_index(stmt, index, diagnostics)?;
        }
        if let Some(value) = stmt.child(1) {
            if let Some(ty) = self.typer.resolve(value)? {
                if !self.compatible(&ty, &element) {
                    self.report(
                        stmt,
                        format!("Incompatible types: {ty} and {element}"),
                        diagnostics,
                    );
                }
            }
        }
        Ok(())
    }

    /// `a.length`: `a` must be an array.
    pub(super) fn check_array_length(&self, length: Node<'_>, diagnostics: &mut Diagnostics) -> Result<()> {
        let Some(array) = length.child(0) else {
            return Ok(());
        };
        if let Some(ty) = self.typer.resolve(array)? {
            if !ty.is_array() {
                self.report(
                    length,
                    format!("Can't get the length of a non array: {}", describe(array)),
                    diagnostics,
                );
            }
        }
        Ok(())
    }

    fn check_index(&self, at: Node<'_>, index: Node<'_>, diagnostics: &mut Diagnostics) -> Result<()> {
        if let Some(ty) = self.typer.resolve(index)? {
            if ty != Type::int() {
                self.report(
                    at,
                    format!("Can't do an array expression with non int: {ty}"),
                    diagnostics,
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::test_support::{analyze, in_method};

    #[test]
    fn literal_elements_share_a_type() {
        let diagnostics = analyze(|b| {
            in_method(b, false, |b| {
                let t = b.int_array_type();
                let xs = b.var_decl("xs", t);
                let e1 = b.int_lit(1);
                let e2 = b.bool_lit(true);
                let e3 = b.int_lit(3);
                let lit = b.array_literal(vec![e1, e2, e3]);
                vec![xs, b.assign("xs", lit)]
            })
        });
        assert_eq!(diagnostics.messages(), vec!["Different types: int and boolean"]);
    }

    #[test]
    fn untyped_leading_element_does_not_hide_mismatches() {
        let diagnostics = analyze(|b| {
            let io = b.import("io");
            let mut class = in_method(b, false, |b| {
                let t = b.int_array_type();
                let xs = b.var_decl("xs", t);
                let recv = b.ident("io");
                let e1 = b.call("read", recv, vec![]);
                let e2 = b.int_lit(1);
                let e3 = b.bool_lit(true);
                let lit = b.array_literal(vec![e1, e2, e3]);
                vec![xs, b.assign("xs", lit)]
            });
            class.insert(0, io);
            class
        });
        assert_eq!(diagnostics.messages(), vec!["Different types: int and boolean"]);
    }

    #[test]
    fn untyped_leading_element_still_checks_target_element() {
        let diagnostics = analyze(|b| {
            let io = b.import("io");
            let mut class = in_method(b, false, |b| {
                let t = b.int_array_type();
                let xs = b.var_decl("xs", t);
                let recv = b.ident("io");
                let e1 = b.call("read", recv, vec![]);
                let e2 = b.bool_lit(true);
                let lit = b.array_literal(vec![e1, e2]);
                vec![xs, b.assign("xs", lit)]
            });
            class.insert(0, io);
            class
        });
        assert_eq!(diagnostics.messages(), vec!["Incompatible types: boolean[] and int[]"]);
    }

    #[test]
    fn uniform_literal_is_fine() {
        let diagnostics = analyze(|b| {
            in_method(b, false, |b| {
                let t = b.int_array_type();
                let xs = b.var_decl("xs", t);
                let e1 = b.int_lit(1);
                let e2 = b.int_lit(2);
                let lit = b.array_literal(vec![e1, e2]);
                vec![xs, b.assign("xs", lit)]
            })
        });
        assert!(diagnostics.is_empty(), "{diagnostics}");
    }

    #[test]
    fn literal_needs_array_target() {
        let diagnostics = analyze(|b| {
            in_method(b, false, |b| {
                let t = b.int_type();
                let x = b.var_decl("x", t);
                let e1 = b.int_lit(1);
                let lit = b.array_literal(vec![e1]);
                vec![x, b.assign("x", lit)]
            })
        });
        assert_eq!(
            diagnostics.messages(),
            vec!["Can't initiate an array when it does not exist: x"]
        );
    }

    #[test]
    fn indexing_rules() {
        let diagnostics = analyze(|b| {
            in_method(b, false, |b| {
                let t = b.int_type();
                let x = b.var_decl("x", t);
                let t = b.int_array_type();
                let xs = b.var_decl("xs", t);
                let arr = b.ident("x");
                let i = b.int_lit(0);
                let bad = b.array_access(arr, i);
                let s1 = b.assign("x", bad);
                let arr = b.ident("xs");
                let i = b.bool_lit(true);
                let bad = b.array_access(arr, i);
                let s2 = b.assign("x", bad);
                vec![x, xs, s1, s2]
            })
        });
        assert_eq!(
            diagnostics.messages(),
            vec![
                "Can't do an array expression with non array: x",
                "Can't do an array expression with non int: boolean",
            ]
        );
    }

    #[test]
    fn element_assignment() {
        let diagnostics = analyze(|b| {
            in_method(b, false, |b| {
                let t = b.int_array_type();
                let xs = b.var_decl("xs", t);
                let i = b.int_lit(0);
                let v = b.bool_lit(false);
                let s1 = b.array_assign("xs", i, v);
                let i = b.int_lit(0);
                let v = b.int_lit(7);
                let s2 = b.array_assign("xs", i, v);
                vec![xs, s1, s2]
            })
        });
        assert_eq!(diagnostics.messages(), vec!["Incompatible types: boolean and int"]);
    }

    #[test]
    fn length_of_scalar() {
        let diagnostics = analyze(|b| {
            in_method(b, false, |b| {
                let t = b.int_type();
                let x = b.var_decl("x", t);
                let arr = b.ident("x");
                let len = b.length(arr);
                vec![x, b.assign("x", len)]
            })
        });
        assert_eq!(diagnostics.messages(), vec!["Can't get the length of a non array: x"]);
    }
}
