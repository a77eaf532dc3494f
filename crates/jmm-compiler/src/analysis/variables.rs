//! Name resolution and static context.

use jmm_ast::Node;
use jmm_core::Diagnostics;

use super::Analyzer;
use crate::types::Binding;

impl Analyzer<'_> {
    /// An identifier must resolve to a local, parameter, field, import, the
    /// class itself or its superclass.
    pub(super) fn check_variable_defined(&self, ident: Node<'_>, diagnostics: &mut Diagnostics) {
        if self.typer.resolve_identifier(ident).is_none() {
            let name = ident.get("name").unwrap_or_default();
            self.report(ident, format!("Variable not defined: {name}"), diagnostics);
        }
    }

    /// The target of `x = ...` or `x[i] = ...` must be a declared variable.
    pub(super) fn check_assign_target(&self, stmt: Node<'_>, diagnostics: &mut Diagnostics) {
        if self.assign_target(stmt).is_none() {
            let name = stmt.get("name").unwrap_or_default();
            self.report(stmt, format!("Variable not defined: {name}"), diagnostics);
        }
    }

    /// A static method may not assign to a name declared as a field, even
    /// when a local or parameter of that name exists.
    pub(super) fn check_static_field_write(&self, stmt: Node<'_>, diagnostics: &mut Diagnostics) {
        if !self.typer.in_static_context(stmt) {
            return;
        }
        let name = stmt.get("name").unwrap_or_default();
        if self.table.field(name).is_some() {
            self.report(
                stmt,
                format!("Can't assign to field in static method: {name}"),
                diagnostics,
            );
        }
    }

    /// A static method may not read a field.
    pub(super) fn check_static_field_read(&self, ident: Node<'_>, diagnostics: &mut Diagnostics) {
        if !self.typer.in_static_context(ident) {
            return;
        }
        if let Some((Binding::Field, _)) = self.typer.resolve_identifier(ident) {
            let name = ident.get("name").unwrap_or_default();
            self.report(
                ident,
                format!("Can't use field in static method: {name}"),
                diagnostics,
            );
        }
    }

    /// `this` has no meaning in a static method.
    pub(super) fn check_static_this(&self, this: Node<'_>, diagnostics: &mut Diagnostics) {
        if self.typer.in_static_context(this) {
            self.report(
                this,
                "Can't use this in static method".to_string(),
                diagnostics,
            );
        }
    }
}
