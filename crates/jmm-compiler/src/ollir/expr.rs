//! Expression lowering.

use std::fmt::Write as _;

use jmm_ast::{Node, NodeKind};
use jmm_core::{InternalError, Type};

use super::{END_STMT, ExprResult, OllirGenerator, Result, ollir_type, operand_name};
use crate::operators::{ArithmeticOp, BooleanOp};
use crate::types::Binding;

impl OllirGenerator<'_> {
    /// Lower an expression whose value is consumed as an `int` or unknown.
    pub(super) fn lower_expr(&mut self, node: Node<'_>) -> Result<ExprResult> {
        self.lower_expr_as(node, None)
    }

    /// Lower an expression. `expected` types the result of calls the class
    /// does not declare.
    pub(super) fn lower_expr_as(&mut self, node: Node<'_>, expected: Option<&Type>) -> Result<ExprResult> {
        match node.kind() {
            NodeKind::IntegerLiteral => Ok(ExprResult::operand(format!(
                "{}.i32",
                node.get("value").unwrap_or("0")
            ))),
            NodeKind::BooleanLiteral => {
                let bit = if node.get("value") == Some("true") { 1 } else { 0 };
                Ok(ExprResult::operand(format!("{bit}.bool")))
            }
            NodeKind::Identifier => Ok(self.lower_identifier(node)),
            NodeKind::This => Ok(ExprResult::operand(format!(
                "this.{}",
                self.table.class_name()
            ))),
            NodeKind::BinaryExpr => {
                let op = ArithmeticOp::of(node)?;
                self.lower_binary(node, op.symbol(), &Type::int())
            }
            NodeKind::BinaryBoolExpr => {
                let op = BooleanOp::of(node)?;
                self.lower_binary(node, op.symbol(), &Type::boolean())
            }
            NodeKind::MethodCall => {
                let expected = expected.cloned().unwrap_or_else(Type::int);
                let (computation, invocation, ty) = self.lower_call(node, Some(&expected))?;
                let temp = self.next_temp(&ollir_type(&ty));
                let computation = format!(
                    "{computation}{temp} :={} {invocation}{END_STMT}",
                    ollir_type(&ty)
                );
                Ok(ExprResult::computed(temp, computation))
            }
            NodeKind::ArrayAccess => self.lower_array_access(node),
            NodeKind::ArrayLiteral => self.lower_array_literal(node),
            NodeKind::NewObject => {
                let class = node.get("name").unwrap_or_default();
                let temp = self.next_temp(&format!(".{class}"));
                let computation = format!(
                    "{temp} :=.{class} new({class}).{class}{END_STMT}\
                     invokespecial({temp}, \"<init>\").V{END_STMT}"
                );
                Ok(ExprResult::computed(temp, computation))
            }
            NodeKind::NewArray => {
                let size = self.child(node, 0)?;
                let size = self.lower_expr(size)?;
                let temp = self.next_temp(".array.i32");
                let computation = format!(
                    "{}{temp} :=.array.i32 new(array, {}).array.i32{END_STMT}",
                    size.computation, size.code
                );
                Ok(ExprResult::computed(temp, computation))
            }
            NodeKind::ArrayLength => {
                let array = self.child(node, 0)?;
                let array = self.lower_expr(array)?;
                let temp = self.next_temp(".i32");
                let computation = format!(
                    "{}{temp} :=.i32 arraylength({}).i32{END_STMT}",
                    array.computation, array.code
                );
                Ok(ExprResult::computed(temp, computation))
            }
            NodeKind::Program
            | NodeKind::ImportDecl
            | NodeKind::ClassDecl
            | NodeKind::VarDecl
            | NodeKind::Type
            | NodeKind::MethodDecl
            | NodeKind::Param
            | NodeKind::AssignStmt
            | NodeKind::ArrayAssignStmt
            | NodeKind::ExprStmt
            | NodeKind::ReturnStmt
            | NodeKind::IfElseStmt
            | NodeKind::WhileStmt
            | NodeKind::BlockStmt => Err(InternalError::NotAnExpression {
                kind: node.kind().to_string(),
                span: node.span(),
            }),
        }
    }

    /// Lower an expression into something usable where only a variable is
    /// accepted, such as an array index. Literals are copied into a temporary.
    pub(super) fn lower_operand(&mut self, node: Node<'_>) -> Result<ExprResult> {
        let result = self.lower_expr(node)?;
        if !node.kind().is_literal() {
            return Ok(result);
        }
        let suffix = if node.is(NodeKind::BooleanLiteral) { ".bool" } else { ".i32" };
        let temp = self.next_temp(suffix);
        let computation = format!("{temp} :={suffix} {}{END_STMT}", result.code);
        Ok(ExprResult::computed(temp, computation))
    }

    fn lower_identifier(&mut self, node: Node<'_>) -> ExprResult {
        let name = node.get("name").unwrap_or_default();
        match self.typer.resolve_identifier(node) {
            Some((Binding::Local | Binding::Param, ty)) => {
                ExprResult::operand(format!("{name}{}", ollir_type(&ty)))
            }
            Some((Binding::Field, ty)) => {
                let suffix = ollir_type(&ty);
                let temp = self.next_temp(&suffix);
                let computation =
                    format!("{temp} :={suffix} getfield(this, {name}{suffix}){suffix}{END_STMT}");
                ExprResult::computed(temp, computation)
            }
            // Class names only appear as static call receivers.
            Some((Binding::Import | Binding::OwnClass | Binding::SuperClass, _)) => {
                ExprResult::operand(name)
            }
            None => ExprResult::operand(format!("{name}.i32")),
        }
    }

    fn lower_binary(&mut self, node: Node<'_>, op: &str, result: &Type) -> Result<ExprResult> {
        let operand_type = match BooleanOp::parse(op) {
            Some(op) if op.is_logical() => Type::boolean(),
            _ => Type::int(),
        };
        let left = self.child(node, 0)?;
        let right = self.child(node, 1)?;
        let left = self.lower_expr_as(left, Some(&operand_type))?;
        let right = self.lower_expr_as(right, Some(&operand_type))?;

        let suffix = ollir_type(result);
        let temp = self.next_temp(&suffix);
        let mut computation = left.computation;
        computation.push_str(&right.computation);
        let _ = write!(
            computation,
            "{temp} :={suffix} {} {op}{suffix} {}{END_STMT}",
            left.code, right.code
        );
        Ok(ExprResult::computed(temp, computation))
    }

    fn lower_array_access(&mut self, node: Node<'_>) -> Result<ExprResult> {
        let array = self.child(node, 0)?;
        let element = self
            .typer
            .resolve(array)?
            .and_then(|ty| ty.element())
            .unwrap_or_else(Type::int);
        let index = self.child(node, 1)?;
        let array = self.lower_expr(array)?;
        let index = self.lower_operand(index)?;

        let suffix = ollir_type(&element);
        let temp = self.next_temp(&suffix);
        let computation = format!(
            "{}{}{temp} :={suffix} {}[{}]{suffix}{END_STMT}",
            array.computation,
            index.computation,
            operand_name(&array.code),
            index.code
        );
        Ok(ExprResult::computed(temp, computation))
    }

    fn lower_array_literal(&mut self, node: Node<'_>) -> Result<ExprResult> {
        let elements: Vec<Node<'_>> = node.children().collect();
        let element = match elements.first() {
            Some(first) => self.typer.resolve(*first)?.unwrap_or_else(Type::int),
            None => Type::int(),
        };
        self.build_array(&elements, &element)
    }

    /// Allocate an array and store each of `elements` into it.
    pub(super) fn build_array(&mut self, elements: &[Node<'_>], element: &Type) -> Result<ExprResult> {
        let array_type = ollir_type(&Type::Array(element.name().to_string()));
        let element_suffix = ollir_type(element);
        let array = self.next_temp(&array_type);
        let mut computation = format!(
            "{array} :={array_type} new(array, {}.i32){array_type}{END_STMT}",
            elements.len()
        );
        for (i, node) in elements.iter().enumerate() {
            let value = self.lower_expr_as(*node, Some(element))?;
            computation.push_str(&value.computation);
            let index = self.next_temp(".i32");
            let _ = write!(
                computation,
                "{index} :=.i32 {i}.i32{END_STMT}{}[{index}]{element_suffix} :={element_suffix} {}{END_STMT}",
                operand_name(&array),
                value.code
            );
        }
        Ok(ExprResult::computed(array, computation))
    }

    /// Child `index` of `node`, or a fault naming the malformed node.
    pub(super) fn child<'a>(&self, node: Node<'a>, index: usize) -> Result<Node<'a>> {
        node.child(index).ok_or_else(|| InternalError::NotAnExpression {
            kind: format!("{} without operand {index}", node.kind()),
            span: node.span(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ollir::tests::lower;
    use jmm_ast::{AstBuilder, NodeId};

    /// `class A { int f; int run(int a, int[] xs) { <body> } }`
    fn in_run(body: impl FnOnce(&mut AstBuilder) -> Vec<NodeId>) -> String {
        lower(|b| {
            let t = b.int_type();
            let f = b.var_decl("f", t);
            let ret = b.int_type();
            let t = b.int_type();
            let a = b.param("a", t);
            let t = b.int_array_type();
            let xs = b.param("xs", t);
            let mut members = vec![a, xs];
            members.extend(body(b));
            let m = b.method("run", ret, false, members);
            vec![b.class("A", None, vec![f, m])]
        })
    }

    fn body_of(code: &str) -> &str {
        let start = code.find(".method public run").unwrap();
        &code[start..]
    }

    #[test]
    fn literals_and_variables_take_no_temporaries() {
        let code = in_run(|b| {
            let v = b.ident("a");
            vec![b.ret(Some(v))]
        });
        assert!(body_of(&code).contains("ret.i32 a.i32;\n"));
        assert!(!body_of(&code).contains(":="));
    }

    #[test]
    fn binary_expression_uses_one_temporary() {
        let code = in_run(|b| {
            let l = b.ident("a");
            let r = b.int_lit(2);
            let sum = b.binary("*", l, r);
            vec![b.ret(Some(sum))]
        });
        assert!(body_of(&code).contains("t0.i32 :=.i32 a.i32 *.i32 2.i32;\nret.i32 t0.i32;\n"));
    }

    #[test]
    fn nested_binary_expressions_compute_inner_first() {
        let code = in_run(|b| {
            let a = b.ident("a");
            let one = b.int_lit(1);
            let inner = b.binary("+", a, one);
            let two = b.int_lit(2);
            let outer = b.binary("-", inner, two);
            vec![b.ret(Some(outer))]
        });
        assert!(body_of(&code).contains(
            "t0.i32 :=.i32 a.i32 +.i32 1.i32;\nt1.i32 :=.i32 t0.i32 -.i32 2.i32;\nret.i32 t1.i32;\n"
        ));
    }

    #[test]
    fn field_reads_go_through_getfield() {
        let code = in_run(|b| {
            let v = b.ident("f");
            vec![b.ret(Some(v))]
        });
        assert!(body_of(&code).contains("t0.i32 :=.i32 getfield(this, f.i32).i32;\nret.i32 t0.i32;\n"));
    }

    #[test]
    fn array_access_and_length() {
        let code = in_run(|b| {
            let arr = b.ident("xs");
            let i = b.int_lit(0);
            let access = b.array_access(arr, i);
            let arr = b.ident("xs");
            let len = b.length(arr);
            let sum = b.binary("+", access, len);
            vec![b.ret(Some(sum))]
        });
        let body = body_of(&code);
        assert!(body.contains("t0.i32 :=.i32 0.i32;\nt1.i32 :=.i32 xs[t0.i32].i32;\n"));
        assert!(body.contains("t2.i32 :=.i32 arraylength(xs.array.i32).i32;\n"));
        assert!(body.contains("t3.i32 :=.i32 t1.i32 +.i32 t2.i32;\n"));
    }

    #[test]
    fn object_construction() {
        let code = in_run(|b| {
            let t = b.class_type("A");
            let o = b.var_decl("o", t);
            let new = b.new_object("A");
            let s = b.assign("o", new);
            let zero = b.int_lit(0);
            vec![o, s, b.ret(Some(zero))]
        });
        assert!(body_of(&code).contains(
            "t0.A :=.A new(A).A;\ninvokespecial(t0.A, \"<init>\").V;\no.A :=.A t0.A;\n"
        ));
    }

    #[test]
    fn array_literal_fills_elements() {
        let code = in_run(|b| {
            let e1 = b.int_lit(4);
            let e2 = b.int_lit(5);
            let lit = b.array_literal(vec![e1, e2]);
            let s = b.assign("xs", lit);
            let zero = b.int_lit(0);
            vec![s, b.ret(Some(zero))]
        });
        assert!(body_of(&code).contains(
            "t0.array.i32 :=.array.i32 new(array, 2.i32).array.i32;\n\
             t1.i32 :=.i32 0.i32;\nt0[t1.i32].i32 :=.i32 4.i32;\n\
             t2.i32 :=.i32 1.i32;\nt0[t2.i32].i32 :=.i32 5.i32;\n\
             xs.array.i32 :=.array.i32 t0.array.i32;\n"
        ));
    }
}
