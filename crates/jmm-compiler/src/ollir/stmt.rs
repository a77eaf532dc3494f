//! Statement and call lowering.

use std::fmt::Write as _;

use jmm_ast::{Node, NodeKind};
use jmm_core::{InternalError, Type};

use super::{END_STMT, MethodContext, OllirGenerator, Result, ollir_type, operand_name};
use crate::types::Binding;

impl OllirGenerator<'_> {
    /// Lower one statement to instruction text.
    pub(super) fn lower_stmt(&mut self, stmt: Node<'_>, ctx: &MethodContext) -> Result<String> {
        match stmt.kind() {
            NodeKind::AssignStmt => self.lower_assign(stmt, ctx),
            NodeKind::ArrayAssignStmt => self.lower_array_assign(stmt, ctx),
            NodeKind::ExprStmt => {
                let expr = self.child(stmt, 0)?;
                if expr.is(NodeKind::MethodCall) {
                    let (computation, invocation, _) = self.lower_call(expr, None)?;
                    Ok(format!("{computation}{invocation}{END_STMT}"))
                } else {
                    Ok(self.lower_expr(expr)?.computation)
                }
            }
            NodeKind::ReturnStmt => {
                let suffix = ollir_type(&ctx.return_type);
                match stmt.child(0) {
                    Some(value) => {
                        let value = self.lower_expr_as(value, Some(&ctx.return_type))?;
                        Ok(format!(
                            "{}ret{suffix} {}{END_STMT}",
                            value.computation, value.code
                        ))
                    }
                    None => Ok(format!("ret{suffix}{END_STMT}")),
                }
            }
            NodeKind::IfElseStmt => self.lower_if(stmt, ctx),
            NodeKind::WhileStmt => self.lower_while(stmt, ctx),
            NodeKind::BlockStmt => {
                let mut code = String::new();
                for child in stmt.children() {
                    code.push_str(&self.lower_stmt(child, ctx)?);
                }
                Ok(code)
            }
            _ => Err(InternalError::NotAStatement {
                kind: stmt.kind().to_string(),
                span: stmt.span(),
            }),
        }
    }

    /// `x = v;` or `putfield` for a field target.
    fn lower_assign(&mut self, stmt: Node<'_>, ctx: &MethodContext) -> Result<String> {
        let name = stmt.get("name").unwrap_or_default();
        let target = self.typer.lookup_variable(Some(&ctx.name), name);
        let target_type = target.as_ref().map_or_else(Type::int, |(_, ty)| ty.clone());
        let value = self.child(stmt, 0)?;
        let value = self.lower_expr_as(value, Some(&target_type))?;

        let suffix = ollir_type(&target_type);
        let mut code = value.computation;
        match target {
            Some((Binding::Field, _)) => {
                let _ = write!(
                    code,
                    "putfield(this, {name}{suffix}, {}).V{END_STMT}",
                    value.code
                );
            }
            _ => {
                let _ = write!(code, "{name}{suffix} :={suffix} {}{END_STMT}", value.code);
            }
        }
        Ok(code)
    }

    /// `a[i] = v;`
    fn lower_array_assign(&mut self, stmt: Node<'_>, ctx: &MethodContext) -> Result<String> {
        let name = stmt.get("name").unwrap_or_default();
        let target = self.typer.lookup_variable(Some(&ctx.name), name);
        let array_type = target.as_ref().map_or_else(Type::int_array, |(_, ty)| ty.clone());
        let element = array_type.element().unwrap_or_else(Type::int);

        let mut code = String::new();
        let array = match target {
            Some((Binding::Field, _)) => {
                let suffix = ollir_type(&array_type);
                let temp = self.next_temp(&suffix);
                let _ = write!(
                    code,
                    "{temp} :={suffix} getfield(this, {name}{suffix}){suffix}{END_STMT}"
                );
                operand_name(&temp).to_string()
            }
            _ => name.to_string(),
        };

        let index = self.child(stmt, 0)?;
        let index = self.lower_operand(index)?;
        let value = self.child(stmt, 1)?;
        let value = self.lower_expr_as(value, Some(&element))?;
        code.push_str(&index.computation);
        code.push_str(&value.computation);

        let suffix = ollir_type(&element);
        let _ = write!(
            code,
            "{array}[{}]{suffix} :={suffix} {}{END_STMT}",
            index.code, value.code
        );
        Ok(code)
    }

    /// ```text
    /// if (cond) goto if_then_N;
    /// <else>
    /// goto if_end_N;
    /// if_then_N:
    /// <then>
    /// if_end_N:
    /// ```
    fn lower_if(&mut self, stmt: Node<'_>, ctx: &MethodContext) -> Result<String> {
        let n = self.next_label();
        let condition = self.child(stmt, 0)?;
        let condition = self.lower_expr_as(condition, Some(&Type::boolean()))?;
        let then = self.child(stmt, 1)?;
        let then = self.lower_stmt(then, ctx)?;
        let otherwise = match stmt.child(2) {
            Some(otherwise) => self.lower_stmt(otherwise, ctx)?,
            None => String::new(),
        };
        Ok(format!(
            "{}if ({}) goto if_then_{n}{END_STMT}{otherwise}goto if_end_{n}{END_STMT}\
             if_then_{n}:\n{then}if_end_{n}:\n",
            condition.computation, condition.code
        ))
    }

    /// ```text
    /// while_cond_N:
    /// if (cond) goto while_body_N;
    /// goto while_end_N;
    /// while_body_N:
    /// <body>
    /// goto while_cond_N;
    /// while_end_N:
    /// ```
    fn lower_while(&mut self, stmt: Node<'_>, ctx: &MethodContext) -> Result<String> {
        let n = self.next_label();
        let condition = self.child(stmt, 0)?;
        let condition = self.lower_expr_as(condition, Some(&Type::boolean()))?;
        let body = self.child(stmt, 1)?;
        let body = self.lower_stmt(body, ctx)?;
        Ok(format!(
            "while_cond_{n}:\n{}if ({}) goto while_body_{n}{END_STMT}goto while_end_{n}{END_STMT}\
             while_body_{n}:\n{body}goto while_cond_{n}{END_STMT}while_end_{n}:\n",
            condition.computation, condition.code
        ))
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    /// Lower a call to `(computation, invocation, result type)`. The
    /// invocation carries no terminator so callers can assign it.
    ///
    /// Calls on a class name (imported, own or super) are static; everything
    /// else is virtual on the lowered receiver. `expected` types calls the
    /// class does not declare; without it they are `void`.
    pub(super) fn lower_call(
        &mut self,
        call: Node<'_>,
        expected: Option<&Type>,
    ) -> Result<(String, String, Type)> {
        let name = call.get("name").unwrap_or_default();
        let receiver = self.child(call, 0)?;
        let declared = self.typer.call_return_type(call)?;
        let ty = declared
            .clone()
            .or_else(|| expected.cloned())
            .unwrap_or_else(Type::void);

        let mut computation = String::new();
        let (kind, target) = match receiver.kind() {
            NodeKind::This => ("invokevirtual", "this".to_string()),
            NodeKind::Identifier => match self.typer.resolve_identifier(receiver) {
                Some((Binding::Import | Binding::OwnClass | Binding::SuperClass, _)) => (
                    "invokestatic",
                    receiver.get("name").unwrap_or_default().to_string(),
                ),
                _ => {
                    let r = self.lower_expr(receiver)?;
                    computation.push_str(&r.computation);
                    ("invokevirtual", r.code)
                }
            },
            _ => {
                let r = self.lower_expr(receiver)?;
                computation.push_str(&r.computation);
                ("invokevirtual", r.code)
            }
        };

        let args: Vec<Node<'_>> = call.children().skip(1).collect();
        let mut codes = Vec::with_capacity(args.len());
        let params = if declared.is_some() {
            self.table.parameters(name)
        } else {
            &[]
        };
        let variadic = params.last().filter(|p| p.ty.is_varargs());
        let fixed = if variadic.is_some() { params.len() - 1 } else { args.len() };

        for (i, arg) in args.iter().enumerate().take(fixed.min(args.len())) {
            let hint = params.get(i).map(|p| &p.ty);
            let r = self.lower_expr_as(*arg, hint)?;
            computation.push_str(&r.computation);
            codes.push(r.code);
        }
        if variadic.is_some() {
            let rest = &args[fixed.min(args.len())..];
            let already_array = match rest {
                [single] => self.typer.resolve(*single)?.is_some_and(|t| t.is_array()),
                _ => false,
            };
            let r = if already_array {
                self.lower_expr(rest[0])?
            } else {
                self.build_array(rest, &Type::int())?
            };
            computation.push_str(&r.computation);
            codes.push(r.code);
        }

        let mut invocation = format!("{kind}({target}, \"{name}\"");
        for code in &codes {
            let _ = write!(invocation, ", {code}");
        }
        let _ = write!(invocation, "){}", ollir_type(&ty));
        Ok((computation, invocation, ty))
    }
}
