//! Variadic declarations.
//!
//! `int...` is only legal as the last parameter of a method. A method named
//! `varargs` additionally requires all of its parameters to share one element
//! type.

use jmm_ast::{Node, NodeKind};
use jmm_core::Diagnostics;

use super::Analyzer;
use crate::symbol_table::{declared_symbol, type_of_type_node};

impl Analyzer<'_> {
    /// Variadic fields are rejected.
    pub(super) fn check_varargs_fields(&self, class: Node<'_>, diagnostics: &mut Diagnostics) {
        for field in class.children_of(NodeKind::VarDecl) {
            if let Ok(symbol) = declared_symbol(field) {
                if symbol.ty.is_varargs() {
                    self.report(field, format!("Invalid use of varargs: {}", symbol.name), diagnostics);
                }
            }
        }
    }

    /// Variadic return types, locals and non-last parameters are rejected.
    pub(super) fn check_varargs_placement(&self, method: Node<'_>, diagnostics: &mut Diagnostics) {
        let name = method.get("name").unwrap_or_default();
        if let Some(ret) = method.child(0).filter(|c| c.is(NodeKind::Type)) {
            if type_of_type_node(ret).is_ok_and(|ty| ty.is_varargs()) {
                self.report(
                    ret,
                    format!("Invalid use of varargs: return type of {name}"),
                    diagnostics,
                );
            }
        }

        let params: Vec<_> = method.children_of(NodeKind::Param).collect();
        let last = params.len().saturating_sub(1);
        for (i, param) in params.iter().enumerate() {
            let Ok(symbol) = declared_symbol(*param) else { continue };
            if symbol.ty.is_varargs() && i != last {
                self.report(
                    *param,
                    format!("Varargs must be the last parameter: {}", symbol.name),
                    diagnostics,
                );
            }
        }

        for local in method.children_of(NodeKind::VarDecl) {
            let Ok(symbol) = declared_symbol(local) else { continue };
            if symbol.ty.is_varargs() {
                self.report(local, format!("Invalid use of varargs: {}", symbol.name), diagnostics);
            }
        }
    }

    /// All parameters of a method named `varargs` share the first one's type.
    pub(super) fn check_varargs_method(&self, method: Node<'_>, diagnostics: &mut Diagnostics) {
        if method.get("name") != Some("varargs") {
            return;
        }
        let symbols: Vec<_> = method
            .children_of(NodeKind::Param)
            .filter_map(|p| declared_symbol(p).ok())
            .collect();
        let Some((first, rest)) = symbols.split_first() else {
            return;
        };
        for param in rest {
            if param.ty.name() != first.ty.name() {
                self.report(
                    method,
                    format!("Different types: {} and {}", first.ty.name(), param.ty.name()),
                    diagnostics,
                );
            }
        }
    }
}
