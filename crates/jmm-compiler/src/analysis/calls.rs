//! Method-call resolution and argument binding.
//!
//! ```text
//! receiver is an import, or typed by one  -> assumed correct
//! callee declared, receiver is own class  -> check arguments
//! callee declared                         -> accepted
//! class has a superclass                  -> assumed inherited
//! otherwise                               -> "Method not defined"
//! ```

use jmm_ast::{Node, NodeKind};
use jmm_core::{Diagnostics, Type};

use super::{Analyzer, Result};
use crate::types::Binding;

impl Analyzer<'_> {
    /// `receiver.name(args)`
    pub(super) fn check_call(&self, call: Node<'_>, diagnostics: &mut Diagnostics) -> Result<()> {
        let name = call.get("name").unwrap_or_default();
        if self.receiver_is_imported(call)? {
            return Ok(());
        }
        if self.table.has_method(name) {
            if self.typer.targets_own_class(call)? {
                self.check_arguments(call, name, diagnostics)?;
            }
            return Ok(());
        }
        if self.table.super_class().is_none() {
            self.report(call, format!("Method not defined: {name}"), diagnostics);
        }
        Ok(())
    }

    /// Whether the receiver names an import or has an imported type.
    fn receiver_is_imported(&self, call: Node<'_>) -> Result<bool> {
        let Some(receiver) = call.child(0) else {
            return Ok(false);
        };
        if receiver.is(NodeKind::Identifier) {
            match self.typer.resolve_identifier(receiver) {
                Some((Binding::Import, _)) => return Ok(true),
                None => return Ok(false),
                Some(_) => {}
            }
        }
        Ok(self
            .typer
            .resolve(receiver)?
            .is_some_and(|ty| self.table.is_imported(ty.name())))
    }

    /// Bind arguments to the declared parameters of `method`.
    ///
    /// A trailing `int...` parameter takes zero or more `int` arguments, or a
    /// single `int[]`.
    fn check_arguments(&self, call: Node<'_>, method: &str, diagnostics: &mut Diagnostics) -> Result<()> {
        let params = self.table.parameters(method);
        let args: Vec<Node<'_>> = call.children().skip(1).collect();
        let (fixed, variadic) = match params.split_last() {
            Some((last, rest)) if last.ty.is_varargs() => (rest, Some(last)),
            _ => (params, None),
        };

        let arity_ok = match variadic {
            Some(_) => args.len() >= fixed.len(),
            None => args.len() == fixed.len(),
        };
        if !arity_ok {
            self.report(
                call,
                format!(
                    "Wrong number of arguments for {method}: expected {}, found {}",
                    params.len(),
                    args.len()
                ),
                diagnostics,
            );
            return Ok(());
        }

        for (arg, param) in args.iter().zip(fixed) {
            let Some(ty) = self.typer.resolve(*arg)? else { continue };
            if !self.compatible(&ty, &param.ty) {
                self.report(
                    *arg,
                    format!("Incompatible types: {ty} and {}", param.ty),
                    diagnostics,
                );
            }
        }

        let Some(variadic) = variadic else {
            return Ok(());
        };
        let rest = &args[fixed.len()..];
        let element = variadic.ty.element().unwrap_or_else(Type::int);
        if let [single] = rest {
            if let Some(ty) = self.typer.resolve(*single)? {
                if ty.is_array() && ty.name() == element.name() {
                    return Ok(());
                }
            }
        }
        for arg in rest {
            let Some(ty) = self.typer.resolve(*arg)? else { continue };
            if ty != element {
                self.report(*arg, format!("Different types: {ty} and {element}"), diagnostics);
            }
        }
        Ok(())
    }
}
