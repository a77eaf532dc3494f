//! Return statements.

use jmm_ast::{Node, NodeKind};
use jmm_core::{Diagnostics, Type};

use super::{Analyzer, Result};

impl Analyzer<'_> {
    /// The returned value must match the declared return type in name and
    /// array-ness. `void` methods return nothing; others must return a value.
    pub(super) fn check_return(&self, stmt: Node<'_>, diagnostics: &mut Diagnostics) -> Result<()> {
        let Some(method) = self.method_of(stmt) else {
            return Ok(());
        };
        let declared = self.table.return_type(method).cloned().unwrap_or_else(Type::void);

        let Some(value) = stmt.child(0) else {
            if !declared.is_void() {
                self.report(
                    stmt,
                    format!("Incompatible types: void and {declared}"),
                    diagnostics,
                );
            }
            return Ok(());
        };

        // Unbound names are reported once, by name resolution.
        if value.is(NodeKind::Identifier) && self.typer.resolve_identifier(value).is_none() {
            return Ok(());
        }
        let Some(actual) = self.typer.resolve(value)? else {
            return Ok(());
        };
        if declared.is_void() || !self.compatible(&actual, &declared) {
            self.report(
                stmt,
                format!("Incompatible types: {actual} and {declared}"),
                diagnostics,
            );
        }
        Ok(())
    }
}
