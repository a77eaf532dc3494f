//! Operand types of binary expressions.

use jmm_ast::{Node, NodeKind};
use jmm_core::{Diagnostics, Type};

use super::{Analyzer, Result};
use crate::operators::{ArithmeticOp, BooleanOp};

/// What an operand was found to be.
enum Operand {
    /// A literal of the expected kind, or an assumed call result.
    Accepted(Type),
    /// Anything else, with its resolved type.
    Resolved(Type),
}

impl Operand {
    fn ty(&self) -> &Type {
        match self {
            Operand::Accepted(ty) | Operand::Resolved(ty) => ty,
        }
    }

    fn satisfies(&self, expected: &Type) -> bool {
        match self {
            Operand::Accepted(_) => true,
            Operand::Resolved(ty) => ty == expected,
        }
    }
}

impl Analyzer<'_> {
    /// `+ - * /` take two `int` operands.
    pub(super) fn check_arithmetic(&self, expr: Node<'_>, diagnostics: &mut Diagnostics) -> Result<()> {
        ArithmeticOp::of(expr)?;
        self.check_operands(expr, &Type::int(), NodeKind::IntegerLiteral, diagnostics)
    }

    /// `&& ||` take two `boolean` operands; comparisons take two `int`s.
    pub(super) fn check_boolean(&self, expr: Node<'_>, diagnostics: &mut Diagnostics) -> Result<()> {
        if BooleanOp::of(expr)?.is_logical() {
            self.check_operands(expr, &Type::boolean(), NodeKind::BooleanLiteral, diagnostics)
        } else {
            self.check_operands(expr, &Type::int(), NodeKind::IntegerLiteral, diagnostics)
        }
    }

    fn check_operands(
        &self,
        expr: Node<'_>,
        expected: &Type,
        literal: NodeKind,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let (Some(left), Some(right)) = (expr.child(0), expr.child(1)) else {
            return Ok(());
        };
        let left = self.operand(left, expected, literal)?;
        let right = self.operand(right, expected, literal)?;
        if !left.satisfies(expected) || !right.satisfies(expected) {
            self.report(
                expr,
                format!("Incompatible types: {} and {}", left.ty(), right.ty()),
                diagnostics,
            );
        }
        Ok(())
    }

    fn operand(&self, node: Node<'_>, expected: &Type, literal: NodeKind) -> Result<Operand> {
        if node.is(literal) {
            return Ok(Operand::Accepted(expected.clone()));
        }
        Ok(match self.typer.resolve(node)? {
            Some(ty) => Operand::Resolved(ty),
            None => Operand::Accepted(expected.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::test_support::{analyze, in_method};

    #[test]
    fn arithmetic_needs_ints() {
        let diagnostics = analyze(|b| {
            in_method(b, false, |b| {
                let t = b.int_type();
                let x = b.var_decl("x", t);
                let t = b.bool_type();
                let flag = b.var_decl("flag", t);
                let t = b.int_array_type();
                let xs = b.var_decl("xs", t);
                let l = b.ident("flag");
                let r = b.int_lit(1);
                let bad = b.binary("+", l, r);
                let s1 = b.assign("x", bad);
                let l = b.ident("xs");
                let r = b.ident("x");
                let bad = b.binary("*", l, r);
                let s2 = b.assign("x", bad);
                let l = b.ident("x");
                let r = b.int_lit(2);
                let good = b.binary("-", l, r);
                let s3 = b.assign("x", good);
                vec![x, flag, xs, s1, s2, s3]
            })
        });
        assert_eq!(
            diagnostics.messages(),
            vec!["Incompatible types: boolean and int", "Incompatible types: int[] and int"]
        );
    }

    #[test]
    fn logical_operators_need_booleans() {
        let diagnostics = analyze(|b| {
            in_method(b, false, |b| {
                let t = b.bool_type();
                let flag = b.var_decl("flag", t);
                let l = b.int_lit(1);
                let r = b.bool_lit(true);
                let bad = b.bool_binary("&&", l, r);
                let s1 = b.assign("flag", bad);
                let l = b.int_lit(1);
                let r = b.int_lit(2);
                let good = b.bool_binary("<", l, r);
                let s2 = b.assign("flag", good);
                vec![flag, s1, s2]
            })
        });
        assert_eq!(diagnostics.messages(), vec!["Incompatible types: int and boolean"]);
    }

    #[test]
    fn comparisons_need_ints() {
        let diagnostics = analyze(|b| {
            in_method(b, false, |b| {
                let t = b.bool_type();
                let flag = b.var_decl("flag", t);
                let l = b.ident("flag");
                let r = b.int_lit(2);
                let bad = b.bool_binary("<", l, r);
                vec![flag, b.assign("flag", bad)]
            })
        });
        assert_eq!(diagnostics.messages(), vec!["Incompatible types: boolean and int"]);
    }
}
